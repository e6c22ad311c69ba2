use super::*;

fn card(approved: u32, denied: u32) -> Card {
    Card { name: "Freedom".into(), issuer: None, image_url: None, annual_fee: None, approved, denied }
}

#[test]
fn approval_summary_rounds_percentage() {
    assert_eq!(approval_summary(&card(2, 1)), "67% approved (2 of 3)");
}

#[test]
fn approval_summary_without_reports() {
    assert_eq!(approval_summary(&card(0, 0)), "No reports yet");
}
