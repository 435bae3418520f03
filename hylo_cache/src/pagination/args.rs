// SPDX-License-Identifier: AGPL-3.0-or-later

use crate::value::Arguments;

/// Names of arguments which only select a page and never change which list is read.
pub const PAGINATION_ARGS: [&str; 4] = ["cursor", "limit", "offset", "first"];

/// Returns true if two argument sets describe the same query, ignoring the given arguments.
///
/// Every other argument needs to be present in both sets and compare equal. Maps compare
/// independent of key order, lists and scalars by value.
pub fn compare_args(field_args: &Arguments, connection_args: &Arguments, ignored: &[&str]) -> bool {
    let is_ignored = |key: &String| ignored.contains(&key.as_str());

    let all_match = connection_args
        .iter()
        .filter(|(key, _)| !is_ignored(key))
        .all(|(key, value)| field_args.get(key) == Some(value));

    // Arguments only set on the current read disqualify a match as well
    all_match
        && field_args
            .keys()
            .filter(|key| !is_ignored(key))
            .all(|key| connection_args.contains_key(key))
}

/// Returns a copy of the arguments without the given ones.
pub fn strip_args(args: &Arguments, names: &[&str]) -> Arguments {
    args.iter()
        .filter(|(key, _)| !names.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}
