/// Whole IOPS with thousands separators, ie. `437,204`
pub fn format_iops(value: f64) -> String {
    let rounded = format!("{}", value.abs().round());
    let mut grouped = String::with_capacity(rounded.len() + rounded.len() / 3);
    for (i, digit) in rounded.chars().enumerate() {
        if i > 0 && (rounded.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    if value < 0.0 && grouped.chars().any(|x| x != '0' && x != ',') {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// Read/append ratio, ie. `2.58x`
pub fn format_ratio(ratio: f64) -> String {
    format!("{ratio:.2}x")
}

/// Comparative multiple between two devices, ie. `1.8x`
pub fn format_multiple(multiple: f64) -> String {
    format!("{multiple:.1}x")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iops_grouping() {
        assert_eq!(format_iops(0.0), "0");
        assert_eq!(format_iops(999.0), "999");
        assert_eq!(format_iops(1000.0), "1,000");
        assert_eq!(format_iops(43289.0), "43,289");
        assert_eq!(format_iops(437204.0), "437,204");
        assert_eq!(format_iops(1234567.4), "1,234,567");
        assert_eq!(format_iops(297746.5), "297,747");
        assert_eq!(format_iops(-25000.0), "-25,000");
        assert_eq!(format_iops(-0.2), "0");
    }

    #[test]
    fn ratio_and_multiple() {
        assert_eq!(format_ratio(437204.0 / 169702.0), "2.58x");
        assert_eq!(format_ratio(1.0), "1.00x");
        assert_eq!(format_multiple(437204.0 / 43289.0), "10.1x");
    }
}
