//! Display formatting.

/// Groups digits the Indian way: last three, then pairs (`7760505` -> `77,60,505`).
pub fn group_indian(value: u64) -> String {
    let digits = value.to_string();
    if digits.len() <= 3 {
        return digits;
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut rest = head;
    while rest.len() > 2 {
        let (front, pair) = rest.split_at(rest.len() - 2);
        groups.push(pair);
        rest = front;
    }
    if !rest.is_empty() {
        groups.push(rest);
    }
    groups.reverse();

    format!("{},{}", groups.join(","), tail)
}

/// Rounds to a whole number before grouping. Negative and NaN values read as zero.
pub fn number(value: f64) -> String {
    if !value.is_finite() || value <= 0.0 {
        return "0".to_string();
    }
    group_indian(value.round() as u64)
}

/// Whole-rupee currency display, e.g. `₹77,60,505`.
pub fn inr(value: f64) -> String {
    format!("₹{}", number(value))
}

/// Paise to rupees with exactly two decimals (`14850` -> `"148.50"`).
pub fn paise_to_rupees(paise: u64) -> String {
    format!("{}.{:02}", paise / 100, paise % 100)
}

/// Up to two uppercase initials; `GG` when the name is blank.
pub fn initials(name: &str) -> String {
    let letters: String = name
        .split_whitespace()
        .take(2)
        .filter_map(|part| part.chars().next())
        .flat_map(char::to_uppercase)
        .collect();

    if letters.is_empty() {
        "GG".to_string()
    } else {
        letters
    }
}

pub fn fallback_avatar_url(name: &str) -> String {
    let name = if name.trim().is_empty() { "User" } else { name };
    format!(
        "https://ui-avatars.com/api/?name={}&background=16a34a&color=fff",
        urlencoding::encode(name)
    )
}

pub fn qr_code_url(target: &str, size: u32) -> String {
    format!(
        "https://quickchart.io/qr?text={}&size={}",
        urlencoding::encode(target),
        size
    )
}

/// Map search link for a picked coordinate pair.
pub fn map_search_url(latitude: f64, longitude: f64) -> String {
    format!(
        "https://www.mapbox.com/search?query={}",
        urlencoding::encode(&format!("{latitude},{longitude}"))
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_indian() {
        assert_eq!(group_indian(0), "0");
        assert_eq!(group_indian(999), "999");
        assert_eq!(group_indian(1000), "1,000");
        assert_eq!(group_indian(15517), "15,517");
        assert_eq!(group_indian(325937), "3,25,937");
        assert_eq!(group_indian(7760505), "77,60,505");
        assert_eq!(group_indian(123456789), "12,34,56,789");
    }

    #[test]
    fn test_inr_rounds() {
        assert_eq!(inr(7760505.0), "₹77,60,505");
        assert_eq!(number(325936.6), "3,25,937");
        assert_eq!(number(f64::NAN), "0");
    }

    #[test]
    fn test_paise_to_rupees() {
        assert_eq!(paise_to_rupees(14850), "148.50");
        assert_eq!(paise_to_rupees(9900), "99.00");
        assert_eq!(paise_to_rupees(5), "0.05");
    }

    #[test]
    fn test_initials() {
        assert_eq!(initials("asha mehta rao"), "AM");
        assert_eq!(initials("  "), "GG");
        assert_eq!(initials("ravi"), "R");
    }

    #[test]
    fn test_avatar_url_encodes_name() {
        assert_eq!(
            fallback_avatar_url("Asha Mehta"),
            "https://ui-avatars.com/api/?name=Asha%20Mehta&background=16a34a&color=fff"
        );
        assert!(fallback_avatar_url("").contains("name=User"));
    }
}
