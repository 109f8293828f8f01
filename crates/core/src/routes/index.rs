pub const INDEX_ENDPOINT: &str = "/";

pub async fn index_handler() -> &'static str {
    concat!(
        env!("CARGO_PKG_NAME"),
        " ",
        env!("CARGO_PKG_VERSION"),
        "\n\n",
        "GET /api/asteroids/nearby?lat=&lng=&radius=\n",
        "GET /api/satellites/nearby?lat=&lng=&radius=\n",
    )
}
