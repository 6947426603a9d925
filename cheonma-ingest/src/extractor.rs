//! Pattern-based field extraction from one free-form utterance.
//!
//! Each field has its own ordered pattern list:
//!   amount    - every pattern, every match; the largest value wins
//!   payment   - first keyword set that matches wins, Card otherwise
//!   location  - first usable postposition match, then the brand list
//!   time      - relative day, then a stated clock time, then `now`
//!
//! Extraction never fails. Anything it cannot read falls back to a default
//! and lowers `extraction_confidence`.

use anyhow::Result;
use chrono::{Duration, NaiveDateTime};
use cheonma_core::{
    CandidateRecord, Category, Direction, ExtractionHints, InputError, PaymentMethod, TimeSource,
    MAX_LOCATION_CHARS,
};
use regex::{Captures, Regex};
use std::collections::HashSet;

use crate::lexicon::{
    payment_keywords, payment_keywords_longest_first, BRANDS, INCOME_KEYWORDS, PARTICLES,
    PLACEHOLDER_DESCRIPTION, RELATIVE_DAYS, TIME_WORDS,
};

/// Amounts below this are treated as noise.
const MIN_AMOUNT: u64 = 10;

/// Turns one amount match into KRW.
type AmountReader = fn(&Captures) -> Option<u64>;

fn number(caps: &Captures, group: usize) -> Option<u64> {
    caps.get(group)?.as_str().replace(',', "").parse().ok()
}

fn read_plain(caps: &Captures) -> Option<u64> {
    number(caps, 1)
}

fn read_thousands(caps: &Captures) -> Option<u64> {
    number(caps, 1)?.checked_mul(1_000)
}

fn read_ten_thousands(caps: &Captures) -> Option<u64> {
    number(caps, 1)?.checked_mul(10_000)
}

fn read_compound(caps: &Captures) -> Option<u64> {
    let man = number(caps, 1)?.checked_mul(10_000)?;
    let cheon = number(caps, 2)?.checked_mul(1_000)?;
    man.checked_add(cheon)
}

pub struct FieldExtractor {
    amount_patterns: Vec<(Regex, AmountReader)>,
    location_patterns: Vec<Regex>,
    clock_re: Regex,
    colon_clock_re: Regex,
    payment_keywords: Vec<&'static str>,
    /// Taxonomy keywords and brands; never particle-stripped ("떡볶이").
    known_nouns: HashSet<&'static str>,
}

impl FieldExtractor {
    pub fn new() -> Result<Self> {
        let amount_patterns: Vec<(Regex, AmountReader)> = vec![
            // 12,000원 / 4500원
            (Regex::new(r"(\d+(?:,\d{3})*)\s*원")?, read_plain),
            // 12천원
            (Regex::new(r"(\d+)\s*천\s*원?")?, read_thousands),
            // 5만원
            (Regex::new(r"(\d+)\s*만\s*원?")?, read_ten_thousands),
            // 5만2천원
            (Regex::new(r"(\d+)\s*만\s*(\d+)\s*천\s*원?")?, read_compound),
        ];

        let location_patterns = vec![
            // "스타벅스에서": at X
            Regex::new(r"(\S+?)에서(?:\s|$)")?,
            // "엄마한테서", "회사로부터": from X
            Regex::new(r"(\S+?)(?:으로부터|로부터|에게서|한테서)(?:\s|$)")?,
        ];

        Ok(Self {
            amount_patterns,
            location_patterns,
            clock_re: Regex::new(r"(?:(오전|오후)\s*)?(\d{1,2})\s*시(?:\s*(\d{1,2})\s*분)?")?,
            colon_clock_re: Regex::new(r"(\d{1,2}):(\d{2})")?,
            payment_keywords: payment_keywords_longest_first(),
            known_nouns: Category::ALL
                .into_iter()
                .flat_map(Category::keywords)
                .chain(BRANDS.iter().copied())
                .collect(),
        })
    }

    /// Extract a candidate record from `raw_text`, with `now` as the local clock.
    pub fn extract(&self, raw_text: &str, now: NaiveDateTime) -> CandidateRecord {
        self.assemble(raw_text, now, &ExtractionHints::default())
    }

    /// Like [`FieldExtractor::extract`], but declared values override extracted ones.
    pub fn extract_with_hints(
        &self,
        raw_text: &str,
        now: NaiveDateTime,
        hints: &ExtractionHints,
    ) -> Result<CandidateRecord, InputError> {
        hints.validate()?;
        Ok(self.assemble(raw_text, now, hints))
    }

    fn assemble(&self, raw_text: &str, now: NaiveDateTime, hints: &ExtractionHints) -> CandidateRecord {
        let amount = match hints.amount {
            Some(declared) => u64::try_from(declared).unwrap_or(0),
            None => self.extract_amount(raw_text),
        };
        if amount == 0 {
            tracing::debug!(raw_text, "no amount recognised; defaulting to 0");
        }

        let (payment_method, payment_stated) = match hints.payment_method {
            Some(method) => (method, true),
            None => self.extract_payment_method(raw_text),
        };

        let merchant_location = hints
            .location
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .or_else(|| self.extract_location(raw_text));

        let (occurs_at, time_source) = match hints.occurs_at {
            Some(at) => (at, TimeSource::Stated),
            None => self.extract_occurs_at(raw_text, now),
        };

        let direction = extract_direction(raw_text);
        let description = self.clean_description(raw_text, merchant_location.as_deref());
        let extraction_confidence = extraction_confidence(
            raw_text,
            amount,
            merchant_location.is_some(),
            payment_stated,
        );

        tracing::debug!(
            amount,
            payment = payment_method.id(),
            location = merchant_location.as_deref().unwrap_or(""),
            ?time_source,
            ?direction,
            extraction_confidence,
            "extracted candidate record"
        );

        CandidateRecord {
            amount,
            description,
            merchant_location,
            occurs_at,
            time_source,
            direction,
            payment_method,
            raw_text: raw_text.to_string(),
            extraction_confidence,
        }
    }

    /// Largest amount any pattern reads from `text`; 0 when nothing reaches 10원.
    pub fn extract_amount(&self, text: &str) -> u64 {
        let best = self
            .amount_patterns
            .iter()
            .flat_map(|(re, read)| re.captures_iter(text).filter_map(move |caps| read(&caps)))
            .max()
            .unwrap_or(0);

        if best < MIN_AMOUNT { 0 } else { best }
    }

    /// First payment keyword set found in `text`; `false` means the Card default was used.
    pub fn extract_payment_method(&self, text: &str) -> (PaymentMethod, bool) {
        let lower = text.to_lowercase();
        PaymentMethod::ALL
            .into_iter()
            .find(|method| payment_keywords(*method).iter().any(|k| lower.contains(k)))
            .map(|method| (method, true))
            .unwrap_or((PaymentMethod::Card, false))
    }

    pub fn extract_location(&self, text: &str) -> Option<String> {
        for re in &self.location_patterns {
            if let Some(caps) = re.captures(text) {
                let candidate = caps[1].trim();
                if is_usable_location(candidate) {
                    return Some(candidate.to_string());
                }
            }
        }

        BRANDS
            .iter()
            .find(|brand| text.contains(*brand))
            .map(|brand| brand.to_string())
    }

    pub fn extract_occurs_at(&self, text: &str, now: NaiveDateTime) -> (NaiveDateTime, TimeSource) {
        if let Some((_, offset)) = RELATIVE_DAYS.iter().find(|(word, _)| text.contains(word)) {
            let shifted = now.checked_add_signed(Duration::days(*offset)).unwrap_or(now);
            return (shifted, TimeSource::RelativeDay);
        }

        if let Some((hour, minute)) = self.stated_clock(text) {
            if let Some(at) = now.date().and_hms_opt(hour, minute, 0) {
                return (at, TimeSource::Stated);
            }
        }

        (now, TimeSource::Clock)
    }

    /// "오후 3시 20분" or "15:20" as (hour, minute); out-of-range values are ignored.
    fn stated_clock(&self, text: &str) -> Option<(u32, u32)> {
        if let Some(caps) = self.clock_re.captures(text) {
            let mut hour: u32 = caps[2].parse().ok()?;
            let minute: u32 = match caps.get(3) {
                Some(m) => m.as_str().parse().ok()?,
                None => 0,
            };
            match caps.get(1).map(|m| m.as_str()) {
                Some("오후") if hour < 12 => hour += 12,
                Some("오전") if hour == 12 => hour = 0,
                _ => {}
            }
            return (hour < 24 && minute < 60).then_some((hour, minute));
        }

        let caps = self.colon_clock_re.captures(text)?;
        let hour: u32 = caps[1].parse().ok()?;
        let minute: u32 = caps[2].parse().ok()?;
        (hour < 24 && minute < 60).then_some((hour, minute))
    }

    /// Strip amounts, payment words, time expressions and particles from
    /// `text`. Falls back to leading meaningful tokens, then a placeholder.
    pub fn clean_description(&self, text: &str, location: Option<&str>) -> String {
        let mut cleaned = text.to_string();
        for (re, _) in &self.amount_patterns {
            cleaned = re.replace_all(&cleaned, " ").into_owned();
        }
        cleaned = self.clock_re.replace_all(&cleaned, " ").into_owned();
        cleaned = self.colon_clock_re.replace_all(&cleaned, " ").into_owned();

        let mut tokens: Vec<&str> = cleaned
            .split_whitespace()
            .filter(|t| !self.is_payment_token(t))
            .filter_map(|t| self.strip_particle(t))
            .filter(|t| !is_time_expression(t))
            .collect();

        if let Some(location) = location {
            if let Some(pos) = tokens.iter().position(|t| *t == location) {
                tokens.remove(pos);
            }
        }

        let joined = tokens.join(" ");
        if joined.chars().count() >= 2 {
            return joined;
        }

        let fallback: Vec<&str> = text
            .split_whitespace()
            .filter(|word| word.chars().count() > 1)
            .filter(|word| !self.amount_patterns.iter().any(|(re, _)| re.is_match(word)))
            .filter(|word| !self.is_payment_token(word))
            .take(3)
            .collect();

        if fallback.is_empty() {
            PLACEHOLDER_DESCRIPTION.to_string()
        } else {
            fallback.join(" ")
        }
    }

    /// "카드", "카드로", "카카오페이로": a payment keyword plus at most a particle.
    fn is_payment_token(&self, token: &str) -> bool {
        self.payment_keywords.iter().any(|k| {
            token
                .strip_prefix(k)
                .is_some_and(|rest| rest.is_empty() || PARTICLES.contains(&rest))
        })
    }

    /// `None` for a bare particle, otherwise the token minus a trailing
    /// particle when at least two characters of stem remain and the
    /// particle fits the stem's last syllable.
    fn strip_particle<'a>(&self, token: &'a str) -> Option<&'a str> {
        if PARTICLES.contains(&token) {
            return None;
        }
        if self.known_nouns.contains(token) {
            return Some(token);
        }
        for particle in PARTICLES {
            if let Some(stem) = token.strip_suffix(particle) {
                if stem.chars().count() >= 2 && particle_fits(stem, particle) {
                    return Some(stem);
                }
            }
        }
        Some(token)
    }
}

fn is_usable_location(candidate: &str) -> bool {
    let len = candidate.chars().count();
    len > 0 && len <= MAX_LOCATION_CHARS
}

/// Final-consonant index of a Hangul syllable (0 = open syllable).
fn final_consonant(ch: char) -> Option<u32> {
    let code = ch as u32;
    (0xAC00..=0xD7A3)
        .contains(&code)
        .then(|| (code - 0xAC00) % 28)
}

/// Korean particles alternate on whether the preceding syllable is closed:
/// 이/은/을/으로 after a final consonant, 가/는/를 after a vowel, 로 after a
/// vowel or ㄹ. Non-Hangul stems accept any particle.
fn particle_fits(stem: &str, particle: &str) -> bool {
    let Some(jong) = stem.chars().last().and_then(final_consonant) else {
        return true;
    };
    match particle {
        "이" | "은" | "을" | "으로" | "으로부터" => jong != 0,
        "가" | "는" | "를" => jong == 0,
        "로" | "로부터" => jong == 0 || jong == 8,
        _ => true,
    }
}

/// A token made only of time words: "저녁", "어제저녁", "오늘아침".
fn is_time_expression(token: &str) -> bool {
    let mut rest = token;
    while !rest.is_empty() {
        match TIME_WORDS.iter().find(|w| rest.starts_with(*w)) {
            Some(word) => rest = &rest[word.len()..],
            None => return false,
        }
    }
    !token.is_empty()
}

pub fn extract_direction(text: &str) -> Direction {
    if INCOME_KEYWORDS.iter().any(|k| text.contains(k)) {
        Direction::Income
    } else {
        Direction::Expense
    }
}

/// Extraction quality score:
/// - 0.5 base
/// - +0.3 when an amount was read
/// - +0.2 when a location was found
/// - +0.1 when a payment method was stated
/// - +0.1 for utterances longer than 10 characters
pub fn extraction_confidence(raw_text: &str, amount: u64, has_location: bool, payment_stated: bool) -> f64 {
    let mut confidence = 0.5;
    if amount > 0 {
        confidence += 0.3;
    }
    if has_location {
        confidence += 0.2;
    }
    if payment_stated {
        confidence += 0.1;
    }
    if raw_text.chars().count() > 10 {
        confidence += 0.1;
    }
    f64::min(confidence, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike};

    fn extractor() -> FieldExtractor {
        FieldExtractor::new().unwrap()
    }

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 14)
            .unwrap()
            .and_hms_opt(12, 30, 0)
            .unwrap()
    }

    #[test]
    fn test_amount_forms() {
        let x = extractor();
        assert_eq!(x.extract_amount("점심 12,000원"), 12_000);
        assert_eq!(x.extract_amount("용돈 5만원"), 50_000);
        assert_eq!(x.extract_amount("책 12천원"), 12_000);
        assert_eq!(x.extract_amount("옷 5만2천원"), 52_000);
        assert_eq!(x.extract_amount("커피 4500원"), 4_500);
        assert_eq!(x.extract_amount("월급 320만원"), 3_200_000);
    }

    #[test]
    fn test_amount_takes_largest_match() {
        let x = extractor();
        assert_eq!(x.extract_amount("커피 3000원 케이크 7000원"), 7_000);
    }

    #[test]
    fn test_amount_noise_is_zeroed() {
        let x = extractor();
        assert_eq!(x.extract_amount("사탕 5원"), 0);
        assert_eq!(x.extract_amount("그냥 메모"), 0);
    }

    #[test]
    fn test_payment_method_order_and_default() {
        let x = extractor();
        assert_eq!(x.extract_payment_method("현금으로 냈어"), (PaymentMethod::Cash, true));
        assert_eq!(x.extract_payment_method("체크카드 결제"), (PaymentMethod::Card, true));
        assert_eq!(x.extract_payment_method("계좌이체 했음"), (PaymentMethod::Transfer, true));
        assert_eq!(x.extract_payment_method("카카오페이로"), (PaymentMethod::MobilePay, true));
        assert_eq!(x.extract_payment_method("그냥 샀어"), (PaymentMethod::Card, false));
    }

    #[test]
    fn test_location_from_postposition() {
        let x = extractor();
        assert_eq!(x.extract_location("스타벅스에서 아메리카노").as_deref(), Some("스타벅스"));
        assert_eq!(x.extract_location("동네 마트에서 장보기").as_deref(), Some("마트"));
        assert_eq!(x.extract_location("엄마한테서 용돈").as_deref(), Some("엄마"));
    }

    #[test]
    fn test_location_brand_fallback() {
        let x = extractor();
        assert_eq!(x.extract_location("맥도날드 빅맥 세트").as_deref(), Some("맥도날드"));
        assert_eq!(x.extract_location("택시 탔어"), None);
    }

    #[test]
    fn test_location_too_long_is_skipped() {
        let x = extractor();
        let long = format!("{}에서 밥", "가".repeat(51));
        assert_eq!(x.extract_location(&long), None);
    }

    #[test]
    fn test_relative_day_takes_precedence() {
        let x = extractor();
        let (at, source) = x.extract_occurs_at("어제 3시에 택시", now());
        assert_eq!(source, TimeSource::RelativeDay);
        assert_eq!(at, now() - Duration::days(1));

        let (at, _) = x.extract_occurs_at("모레 예약", now());
        assert_eq!(at, now() + Duration::days(2));
    }

    #[test]
    fn test_stated_clock_time() {
        let x = extractor();
        let (at, source) = x.extract_occurs_at("8시 15분 지하철", now());
        assert_eq!(source, TimeSource::Stated);
        assert_eq!((at.hour(), at.minute()), (8, 15));
        assert_eq!(at.date(), now().date());

        let (at, _) = x.extract_occurs_at("오후 3시 영화", now());
        assert_eq!(at.hour(), 15);

        let (at, _) = x.extract_occurs_at("21:40 택시", now());
        assert_eq!((at.hour(), at.minute()), (21, 40));
    }

    #[test]
    fn test_noon_and_midnight_qualifiers() {
        let x = extractor();
        let (at, source) = x.extract_occurs_at("오전 12시 택시", now());
        assert_eq!(source, TimeSource::Stated);
        assert_eq!((at.hour(), at.minute()), (0, 0));

        let (at, _) = x.extract_occurs_at("오후 12시 점심", now());
        assert_eq!(at.hour(), 12);

        let (at, _) = x.extract_occurs_at("오전 9시 30분 커피", now());
        assert_eq!((at.hour(), at.minute()), (9, 30));
    }

    #[test]
    fn test_invalid_clock_keeps_now() {
        let x = extractor();
        assert_eq!(x.extract_occurs_at("25시 편의점", now()), (now(), TimeSource::Clock));
        assert_eq!(x.extract_occurs_at("편의점", now()), (now(), TimeSource::Clock));
    }

    #[test]
    fn test_direction() {
        assert_eq!(extract_direction("월급 들어왔다"), Direction::Income);
        assert_eq!(extract_direction("중고 판매 3만원"), Direction::Income);
        assert_eq!(extract_direction("택시 12000원"), Direction::Expense);
    }

    #[test]
    fn test_clean_description() {
        let x = extractor();
        let d = x.clean_description("스타벅스에서 아메리카노 4500원 카드로 결제", Some("스타벅스"));
        assert_eq!(d, "아메리카노 결제");

        let d = x.clean_description("어제 저녁 치킨 2만원", None);
        assert_eq!(d, "치킨");
    }

    #[test]
    fn test_clean_description_drops_source_location() {
        let x = extractor();
        let r = x.extract("엄마에게서 용돈 5만원", now());
        assert_eq!(r.merchant_location.as_deref(), Some("엄마"));
        assert_eq!(r.description, "용돈");

        let r = x.extract("친구한테서 5만원 받았어", now());
        assert_eq!(r.merchant_location.as_deref(), Some("친구"));
        assert_eq!(r.description, "받았어");

        let r = x.extract("회사로부터 보너스 100만원", now());
        assert_eq!(r.merchant_location.as_deref(), Some("회사"));
        assert_eq!(r.description, "보너스");
    }

    #[test]
    fn test_clean_description_compound_time_words() {
        let x = extractor();
        assert_eq!(x.clean_description("어제저녁 치킨 2만원", None), "치킨");
        assert_eq!(x.clean_description("오늘아침에 샌드위치 5000원", None), "샌드위치");
    }

    #[test]
    fn test_clean_description_keeps_noun_endings() {
        let x = extractor();
        assert_eq!(x.clean_description("떡볶이 6000원", None), "떡볶이");
        // 이 after an open syllable, 가 after a closed one: part of the word
        assert_eq!(x.clean_description("장어구이 할인가 6000원", None), "장어구이 할인가");
        assert_eq!(x.clean_description("커피가 비쌌다", None), "커피 비쌌다");
        assert_eq!(x.clean_description("김치를 샀다", None), "김치 샀다");
    }

    #[test]
    fn test_payment_words_only_removed_as_tokens() {
        let x = extractor();
        // "돈" is a cash keyword but must not be cut out of "용돈"
        assert_eq!(x.clean_description("용돈 현금으로 줬어", None), "용돈 줬어");
        assert_eq!(x.clean_description("토스트 토스로 3000원", None), "토스트");
    }

    #[test]
    fn test_clean_description_fallbacks() {
        let x = extractor();
        // only the location is left after stripping
        assert_eq!(x.clean_description("스타벅스 4500원", Some("스타벅스")), "스타벅스");
        assert_eq!(x.clean_description("4500원 카드", None), PLACEHOLDER_DESCRIPTION);
    }

    #[test]
    fn test_extraction_confidence() {
        assert_eq!(extraction_confidence("짧은", 0, false, false), 0.5);
        assert!((extraction_confidence("짧은", 1000, false, false) - 0.8).abs() < 1e-9);
        assert_eq!(extraction_confidence("스타벅스에서 아메리카노 4500원", 4500, true, true), 1.0);
    }

    #[test]
    fn test_hints_override_extraction() {
        let x = extractor();
        let hints = ExtractionHints {
            amount: Some(9_900),
            payment_method: Some(PaymentMethod::Transfer),
            ..Default::default()
        };
        let r = x.extract_with_hints("관리비 냈음", now(), &hints).unwrap();
        assert_eq!(r.amount, 9_900);
        assert_eq!(r.payment_method, PaymentMethod::Transfer);
        assert_eq!(r.time_source, TimeSource::Clock);
    }

    #[test]
    fn test_hints_are_validated() {
        let x = extractor();
        let hints = ExtractionHints {
            amount: Some(-1),
            ..Default::default()
        };
        assert_eq!(
            x.extract_with_hints("환불", now(), &hints),
            Err(InputError::NegativeAmount(-1))
        );
    }

    #[test]
    fn test_extract_is_deterministic() {
        let x = extractor();
        let text = "어제 GS25에서 삼각김밥 1,500원 현금";
        assert_eq!(x.extract(text, now()), x.extract(text, now()));
    }
}
