//! `impdl config` – show where the config lives and what it resolves to.

use impdl_core::config::ImpdlConfig;
use std::path::Path;

pub fn run_config(cfg: &ImpdlConfig, path: &Path) {
    println!("config file:           {}", path.display());
    println!("default_impersonate:   {}", cfg.default_impersonate);
    println!("download_timeout_secs: {}", cfg.download_timeout_secs);
    println!("verify_tls:            {}", cfg.verify_tls);
    println!("proxy:                 {}", cfg.proxy.as_deref().unwrap_or("-"));
    println!("bind_address:          {}", cfg.bind_address.as_deref().unwrap_or("-"));
    println!("default_headers:       {}", cfg.default_headers);
    if let Err(err) = cfg.handler_settings() {
        println!("warning: {:#}", err);
    }
}
