// Gallery state
//
// GalleryStore owns one gallery's items, selection, paging, and filter. Every
// mutation reports what it changed as GalleryChange values, which the tab
// controller forwards to subscribers.

pub mod filter;
pub mod gallery;
pub mod pagination;

pub use filter::SearchFilter;
pub use gallery::{GalleryChange, GalleryRole, GalleryStore, SelectionMode, ThumbnailCounts};
pub use pagination::{PAGE_SIZE_ALL, PageInfo, Pagination};
