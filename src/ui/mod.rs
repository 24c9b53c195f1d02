// UI module - input handling and view plumbing, toolkit independent
//
// This module contains:
// - TabController: owns a found/selected gallery pair and the jobs filling them
// - SelectionEngine: marquee hit testing over registered item rectangles
// - GridLayout: tile rectangles for a viewport width
// - ViewBridge: forwards controller events to a GalleryView implementation

pub mod bridge;
pub mod controller;
pub mod layout;
pub mod marquee;

pub use bridge::{GalleryView, ViewBridge, dispatch};
pub use controller::{EVENT_CAPACITY, TabController, TabEvent, TabStatus};
pub use layout::GridLayout;
pub use marquee::{MarqueeSelection, PointerDown, SelectionEngine};
