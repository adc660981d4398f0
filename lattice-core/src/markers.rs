//! Marker conventions shared with template output.
//!
//! These strings are part of the wire format of rendered fragments and
//! host documents; they must stay bit-exact across implementations.

/// Class carried by every component container node.
pub const CONTAINER_CLASS: &str = "ui-container";

/// Class mirrored onto a container once lifecycle initialization has run.
pub const LOADED_CLASS: &str = "ui-container-loaded";

/// Attribute naming the template a container is rendered from.
pub const TEMPLATE_ATTR: &str = "data-template-name";

/// Attribute marking the inner containers swapped by a partial re-render.
pub const INNER_CONTAINER_ATTR: &str = "data-container";

/// Event broadcast after a transport exchange completes successfully.
pub const REQUEST_COMPLETED_EVENT: &str = "XHR_Request_Completed";

/// Fault kind under which transport failures are raised.
pub const UNKNOWN_FAULT: &str = "UnknownError";

/// Fault kind that installs the catch-all handler instead of a specific one.
pub const CATCH_ALL: &str = "*";
