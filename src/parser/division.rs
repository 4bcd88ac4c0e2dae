use crate::model::division::Division;

/// Guess the division from keywords anywhere in the pasted text.
///
/// Checked in a fixed order: CS LINE / CUTI LOKAL, then KASIR, then CS, then KAPTEN. The CS LINE
/// check has to come before the plain CS one since every "CS LINE" also contains "CS".
pub fn infer_division(text: &str) -> Option<Division> {
    let upper = text.to_uppercase();

    if upper.contains("CS LINE") || upper.contains("CUTI LOKAL") {
        Some(Division::CsLine)
    } else if upper.contains("KASIR") {
        Some(Division::Kasir)
    } else if upper.contains("CS") {
        Some(Division::Cs)
    } else if upper.contains("KAPTEN") {
        Some(Division::Kapten)
    } else {
        None
    }
}
