use serde::{Deserialize, Serialize};

#[derive(Serialize, Debug)]
pub struct SearchRequest<'a> {
    pub q: &'a str,
    pub limit: usize,
    pub offset: usize,
    pub sort: Vec<&'a str>,
}

#[derive(Deserialize, Debug)]
pub struct SearchResponse {
    pub hits: Vec<serde_json::Value>,
}
