// Copyright: Kyler Chin <kyler@catenarymaps.org>
// Catenary Transit Initiatives
// Removal of the attribution is not allowed, as covered under the AGPL license

#![deny(
    clippy::mutable_key_type,
    clippy::map_entry,
    clippy::boxed_local,
    clippy::let_unit_value,
    clippy::redundant_allocation,
    clippy::bool_comparison,
    clippy::bind_instead_of_map,
    clippy::vec_box,
    clippy::while_let_loop,
    clippy::useless_asref,
    clippy::repeat_once,
    clippy::deref_addrof,
    clippy::suspicious_map,
    clippy::arc_with_non_send_sync,
    clippy::single_char_pattern,
    clippy::for_kv_map,
    clippy::let_unit_value,
    clippy::let_and_return,
    clippy::iter_nth,
    clippy::iter_cloned_collect,
    clippy::bytes_nth,
    clippy::deprecated_clippy_cfg_attr,
    clippy::match_result_ok,
    clippy::cmp_owned,
    clippy::cmp_null,
    clippy::op_ref,
    clippy::useless_vec
)]

pub mod building_codes;
pub mod directions;
pub mod meeting_pattern;
pub mod models;
pub mod postgres_tools;
pub mod schedule_import;
pub mod schema;

use std::time::Duration;
use std::time::{SystemTime, UNIX_EPOCH};

/// Wall-clock timezone for every user-facing timestamp. The campus this
/// backend serves is in Vancouver, and the upstream mapping service speaks
/// epoch seconds, so conversion happens in exactly one place.
pub const LOCAL_TZ: chrono_tz::Tz = chrono_tz::America::Vancouver;

pub fn duration_since_unix_epoch() -> Duration {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap()
}
