//! Pure broadcast-target selection.

use super::ConnectionId;

/// Select broadcast targets: every open connection except `excluded`.
///
/// # Arguments
///
/// * `connections` - Registered connections paired with their transport's open flag
/// * `excluded` - Connection to leave out, or `None` to exclude none
///
/// # Returns
///
/// Connection IDs in registry iteration order
pub fn select_broadcast_targets<I>(connections: I, excluded: Option<ConnectionId>) -> Vec<ConnectionId>
where
    I: IntoIterator<Item = (ConnectionId, bool)>,
{
    connections
        .into_iter()
        .filter(|(id, is_open)| *is_open && Some(*id) != excluded)
        .map(|(id, _)| id)
        .collect()
}
