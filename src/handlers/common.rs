pub async fn root() -> &'static str {
    "Solution gallery: search and browse the solutions library"
}

pub async fn health() -> &'static str {
    "OK"
}
