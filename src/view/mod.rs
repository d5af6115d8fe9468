/// View state and the controller that drives it.
///
/// Submodules:
/// - `state`:      explicit session state: map, inputs, display region, notices.
/// - `controller`: user actions, validation and latest-request-wins bookkeeping.

pub mod controller;
pub mod state;

pub use controller::{Applied, PendingForecast, PendingLoad, PendingShow, ViewController};
pub use state::{DisplayRegion, MapView, Notice, NoticeLevel, ViewState};
