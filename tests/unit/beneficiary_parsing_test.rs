// Bulk beneficiary input parsing: one person per line, "name, id-number".

use typedesk::modules::documents::models::Beneficiary;

#[test]
fn test_parses_name_and_id_pairs() {
    let input = "Ali Khan, 784-1990-1234567\nSara Ahmed, 784-1985-7654321";

    let parsed = Beneficiary::parse_bulk(input);

    assert_eq!(parsed.len(), 2);
    assert_eq!(parsed[0].name, "Ali Khan");
    assert_eq!(parsed[0].id_number.as_deref(), Some("784-1990-1234567"));
    assert_eq!(parsed[1].name, "Sara Ahmed");
}

#[test]
fn test_name_only_lines_have_no_id() {
    let parsed = Beneficiary::parse_bulk("Omar Saleh");

    assert_eq!(parsed.len(), 1);
    assert_eq!(parsed[0].name, "Omar Saleh");
    assert_eq!(parsed[0].id_number, None);
}

#[test]
fn test_blank_lines_are_dropped() {
    let input = "\nAli Khan\n\n   \nSara Ahmed\n\n";

    let parsed = Beneficiary::parse_bulk(input);

    assert_eq!(parsed.len(), 2);
}

#[test]
fn test_nameless_lines_are_excluded_from_count() {
    // A line starting with a comma has an id but no name
    let input = "Ali Khan\n, 784-1990-1234567\nSara Ahmed";

    let parsed = Beneficiary::parse_bulk(input);

    assert_eq!(parsed.len(), 2);
    assert!(parsed.iter().all(|b| !b.name.is_empty()));
}

#[test]
fn test_whitespace_is_trimmed() {
    let parsed = Beneficiary::parse_bulk("  Ali Khan ,  784-1990-1234567  ");

    assert_eq!(parsed[0].name, "Ali Khan");
    assert_eq!(parsed[0].id_number.as_deref(), Some("784-1990-1234567"));
}

#[test]
fn test_trailing_comma_means_no_id() {
    let parsed = Beneficiary::parse_bulk("Ali Khan,");

    assert_eq!(parsed.len(), 1);
    assert_eq!(parsed[0].id_number, None);
}

#[test]
fn test_empty_input_parses_to_nothing() {
    assert!(Beneficiary::parse_bulk("").is_empty());
    assert!(Beneficiary::parse_bulk("\n\n").is_empty());
}
