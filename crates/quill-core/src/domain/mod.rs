//! Domain entities - the core business objects.

mod page;
mod post;
mod user;

pub use page::{Page, PageRequest, SortDirection};
pub use post::{NewPost, Post};
pub use user::{NewUser, User};
