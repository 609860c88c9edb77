#[cfg(feature = "http_api")]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use shift_roster::{HttpConfig, StoreConfig, bootstrap, http_api, logging};

    logging::init();
    let http = HttpConfig::from_env()?;
    let store = bootstrap(&StoreConfig::from_env()?)?;

    println!("shift-roster HTTP API listening on http://{}", http.addr);
    http_api::serve(http.addr, store).await?;
    Ok(())
}

#[cfg(not(feature = "http_api"))]
fn main() {
    eprintln!("Rebuild with the `http_api` feature to enable the HTTP server.");
}
