//! Fixed word lists the extractor matches against.

use cheonma_core::PaymentMethod;

/// Keywords naming `method`. The extractor tests the sets in
/// [`PaymentMethod::ALL`] order.
pub fn payment_keywords(method: PaymentMethod) -> &'static [&'static str] {
    match method {
        PaymentMethod::Cash => &["현금", "돈", "지폐", "동전"],
        PaymentMethod::Card => &["카드", "체크카드", "신용카드", "삼성페이", "애플페이"],
        PaymentMethod::Transfer => &["계좌이체", "이체", "송금", "무통장입금"],
        PaymentMethod::MobilePay => &["카카오페이", "네이버페이", "페이코", "토스", "모바일결제", "간편결제"],
    }
}

/// Merchants recognised by name when no postposition points at a place.
pub const BRANDS: &[&str] = &[
    "스타벅스", "투썸플레이스", "이디야", "폴바셋", "할리스",
    "맥도날드", "버거킹", "KFC", "롯데리아", "서브웨이",
    "GS25", "CU", "세븐일레븐", "이마트24",
    "이마트", "홈플러스", "롯데마트", "코스트코",
];

/// Relative-day words and their offset from today, in precedence order.
pub const RELATIVE_DAYS: &[(&str, i64)] = &[("어제", -1), ("그저께", -2), ("내일", 1), ("모레", 2)];

/// Time words removed from descriptions.
pub const TIME_WORDS: &[&str] = &[
    "오늘", "어제", "그저께", "내일", "모레", "아침", "점심", "저녁", "밤", "새벽", "오전", "오후",
];

pub const INCOME_KEYWORDS: &[&str] = &[
    "받았", "입금", "월급", "급여", "상여금", "보너스", "용돈",
    "수익", "판매", "환불", "캐시백", "적립", "리워드",
    "벌었", "벌어", "소득", "수입", "수당", "배당", "이자",
    "수령", "지급받", "들어왔", "입출금",
];

/// Postpositions stripped from the end of description tokens, longest first.
pub const PARTICLES: &[&str] = &[
    "으로부터", "에게서", "한테서", "로부터", "에서", "에게", "한테", "으로",
    "에", "로", "을", "를", "이", "가", "은", "는", "의",
];

/// Used when nothing meaningful is left of the utterance.
pub const PLACEHOLDER_DESCRIPTION: &str = "거래";

/// Every payment keyword, longest first, so "체크카드" goes before "카드".
pub fn payment_keywords_longest_first() -> Vec<&'static str> {
    let mut all: Vec<&'static str> = PaymentMethod::ALL
        .into_iter()
        .flat_map(|method| payment_keywords(method).iter().copied())
        .collect();
    all.sort_by_key(|k| std::cmp::Reverse(k.chars().count()));
    all
}
