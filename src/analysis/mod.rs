/// Data organization utilities for the forecast view.
///
/// This module provides the grouping step that sits between the fetcher
/// and the renderer. Risk prediction itself happens server-side; the view
/// only regroups what it receives.
///
/// Submodules:
/// - `groupings`: organizes flat forecast output into per-disease structures.

pub mod groupings;
