//! `impdl profiles` – list impersonation profiles.

use impdl_core::config::ImpdlConfig;
use impdl_core::profile::Profile;

pub fn run_profiles(cfg: &ImpdlConfig) {
    println!("{:<16} {:<8} {:<8} {}", "PROFILE", "FAMILY", "VERSION", "MIN TLS");
    for p in Profile::all() {
        let fp = p.fingerprint();
        let marker = if p.as_str() == cfg.default_impersonate { " (default)" } else { "" };
        println!(
            "{:<16} {:<8} {:<8} {}{}",
            p.as_str(),
            format!("{:?}", p.family()).to_lowercase(),
            p.version(),
            fp.min_tls.as_str(),
            marker
        );
    }
}
