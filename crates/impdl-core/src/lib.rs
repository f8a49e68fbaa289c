pub mod config;
pub mod logging;

pub mod adapter;
pub mod client;
pub mod handler;
pub mod http;
pub mod options;
pub mod profile;

pub use handler::{
    DownloadHandler, HandlerError, HttpDownloadHandler, ImpersonateDownloadHandler, Spider,
};
pub use http::{Headers, Request, Response, ResponseKind};
