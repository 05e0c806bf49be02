//! Services - the only layer that turns stored entities into response views.

mod post_service;
mod user_service;

pub use post_service::PostService;
pub use user_service::UserService;

use quill_shared::PageResponse;

use crate::domain::Page;

fn page_view<T>(page: Page<T>) -> PageResponse<T> {
    PageResponse::of(page.items, page.page, page.size, page.total_elements)
}

/// Mask an email for logging to avoid PII in logs: `jane@x.io` -> `j***@x.io`.
pub(crate) fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => match local.chars().next() {
            Some(first) if local.chars().count() > 1 => format!("{first}***@{domain}"),
            _ => format!("***@{domain}"),
        },
        None => "***".to_string(),
    }
}
