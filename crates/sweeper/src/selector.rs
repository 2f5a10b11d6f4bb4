/// Name fragments marking a collection as holding ledger-derived data
pub const LEDGER_MARKERS: [&str; 3] = ["transaction", "block", "contract"];

/// Case-sensitive substring match against [`LEDGER_MARKERS`].
pub fn is_ledger_collection(name: &str) -> bool {
    LEDGER_MARKERS.iter().any(|marker| name.contains(marker))
}

/// Keeps the ledger collections of `names`, preserving their order.
pub fn select_targets<I>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    names
        .into_iter()
        .filter(|name| is_ledger_collection(name))
        .collect()
}
