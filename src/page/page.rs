#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    pub address: String,
    pub body: String,
    pub links: Vec<String>,
}

impl FetchedPage {
    pub fn new(address: impl Into<String>, body: impl Into<String>, links: Vec<String>) -> Self {
        Self {
            address: address.into(),
            body: body.into(),
            links,
        }
    }
}
