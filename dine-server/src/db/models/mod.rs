//! Database Models
//!
//! SurrealDB 持久化记录类型。记录 ID 全栈统一使用 "table:id" 字符串
//! 形式，由 [`serde_helpers`] 负责两种格式的互转。

pub mod serde_helpers;

pub mod booking;
pub mod branding;
pub mod cart;
pub mod category;
pub mod feedback;
pub mod menu;
pub mod notification_token;
pub mod order;
pub mod user;

pub use booking::{Booking, BookingCreate, BookingStatus, BookingStatusUpdate};
pub use branding::{Branding, BrandingUpdate};
pub use cart::{Cart, CartAddItem, CartLine, CartLineView, CartSetQuantity, CartView};
pub use category::{Category, CategoryCreate, CategoryUpdate};
pub use feedback::{Feedback, FeedbackCreate};
pub use menu::{MenuItem, MenuItemCreate, MenuItemUpdate, MenuItemView};
pub use notification_token::{NotificationToken, TokenRegister, TokenUnregister};
pub use order::{Order, OrderCreate, OrderLine};
pub use user::{User, UserCreate, UserPublic};
