//! Optional scratch storage for debugging
//!
//! Raw fetched bodies and transformed records can be persisted under the
//! configured scratch directory. Nothing downstream depends on these files
//! existing; every write failure is logged and swallowed so scratch I/O can
//! never affect a run's outcome.

use crate::transform::SiteRecord;
use std::path::Path;
use url::Url;

/// Directory-safe name for a site, derived from its host
fn site_dir_name(site: &Url) -> String {
    let host = site.host_str().unwrap_or("unknown-host");
    match site.port() {
        Some(port) => format!("{}_{}", host, port),
        None => host.to_string(),
    }
}

/// Stores the raw homepage body under `<dir>/<host>/homepage.html`
pub fn store_raw_body(dir: &Path, site: &Url, body: &str) {
    let site_dir = dir.join(site_dir_name(site));

    let result = std::fs::create_dir_all(&site_dir)
        .and_then(|_| std::fs::write(site_dir.join("homepage.html"), body));

    if let Err(e) = result {
        tracing::warn!("[{}] Failed to store raw body in scratch: {}", site, e);
    }
}

/// Stores the transformed record under `<dir>/<host>.json`
pub fn store_site_record(dir: &Path, record: &SiteRecord) {
    let path = dir.join(format!("{}.json", site_dir_name(&record.site)));

    let result = std::fs::create_dir_all(dir).and_then(|_| {
        let json = serde_json::to_vec_pretty(record)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(&path, json)
    });

    if let Err(e) = result {
        tracing::warn!(
            "[{}] Failed to store site record in scratch: {}",
            record.site,
            e
        );
    }
}
