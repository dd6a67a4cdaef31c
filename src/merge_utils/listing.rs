use crate::actions::Utxo;

/// Smallest units per whole coin.
pub const UNITS_PER_COIN: u64 = 100_000_000;

pub const COIN_SYMBOL: &str = "BTM";

/// Renders an integer unit amount as a coin value with eight decimals.
pub fn format_amount(units: u64) -> String {
    format!("{}.{:08}", units / UNITS_PER_COIN, units % UNITS_PER_COIN)
}

pub fn listing_line(index: usize, utxo: &Utxo, current_height: u64) -> String {
    format!(
        "{:4}. {:>13} {} {}{}",
        index,
        format_amount(utxo.amount),
        COIN_SYMBOL,
        utxo.id,
        if utxo.is_mature(current_height) {
            ""
        } else {
            " (not mature)"
        }
    )
}

pub fn merge_summary(merge_set: &[Utxo]) -> String {
    let total = merge_set
        .iter()
        .fold(0u64, |total, utxo| total.saturating_add(utxo.amount));
    format!(
        "To merge {} UTXOs with {:>13} {}",
        merge_set.len(),
        format_amount(total),
        COIN_SYMBOL
    )
}
