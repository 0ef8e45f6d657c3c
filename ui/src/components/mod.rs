pub mod error_banner;
pub mod pagination_controls;
pub mod stat_card;

pub use error_banner::ErrorBanner;
pub use pagination_controls::PaginationControls;
pub use stat_card::StatCard;
