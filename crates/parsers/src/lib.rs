mod common;
mod contract;
mod hp;
mod juniper;
mod linux;

pub use common::{col, normalize_mac, split_on_marker_lines};
pub use contract::{select_parser, VendorParser};
