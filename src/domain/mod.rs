pub mod user;
pub mod camp;
pub mod registration;
pub mod payment;
pub mod feedback;

pub use user::*;
pub use camp::*;
pub use registration::*;
pub use payment::*;
pub use feedback::*;

/// Zero-based page/size pagination, `skip = page * size`. Pages past the end
/// of the result set come back empty rather than erroring.
#[derive(Debug, Clone, Copy, serde::Deserialize)]
pub struct Page {
    #[serde(default)]
    pub page: i64,
    #[serde(default = "default_page_size")]
    pub size: i64,
}

fn default_page_size() -> i64 {
    10
}

impl Default for Page {
    fn default() -> Self {
        Self { page: 0, size: default_page_size() }
    }
}

impl Page {
    pub fn limit(&self) -> i64 {
        self.size.max(0)
    }

    pub fn offset(&self) -> i64 {
        self.page.max(0) * self.size.max(0)
    }
}
