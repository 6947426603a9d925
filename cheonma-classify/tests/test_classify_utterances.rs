use chrono::{NaiveDate, NaiveDateTime};
use cheonma_classify::{AiHint, Classifier, ClassifierConfig, FALLBACK_CONFIDENCE};
use cheonma_core::{Category, Direction, PaymentMethod};
use cheonma_ingest::FieldExtractor;

fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 3, 14)
        .unwrap()
        .and_hms_opt(12, 30, 0)
        .unwrap()
}

const SAMPLES: &[&str] = &[
    "스타벅스에서 아메리카노 4500원 카드로 결제",
    "이번 달 월급 받았어 320만원",
    "그냥 메모 남겨둠",
    "어제 GS25에서 삼각김밥 1,500원 현금",
    "관리비 15만원 계좌이체",
    "오후 8시 CGV 영화표 2만4천원",
    "카카오페이로 택시 12000원",
    "중고 판매로 5만원 들어왔다",
    "올리브영 화장품 3만원 토스",
    "12천원",
    "",
];

/// End-to-end: extract then classify, the way the CLI does.
fn run(text: &str, hint: Option<&AiHint>) -> (cheonma_core::CandidateRecord, cheonma_core::ClassificationResult) {
    let extractor = FieldExtractor::new().unwrap();
    let record = extractor.extract(text, now());
    let result = Classifier::default().classify(text, &record, hint);
    (record, result)
}

#[test]
fn test_cafe_card_purchase() {
    let (record, result) = run("스타벅스에서 아메리카노 4500원 카드로 결제", None);

    assert_eq!(record.amount, 4_500);
    assert_eq!(record.payment_method, PaymentMethod::Card);
    assert_eq!(record.merchant_location.as_deref(), Some("스타벅스"));
    assert_eq!(record.direction, Direction::Expense);

    assert_eq!(result.category, Category::Food);
    assert_eq!(result.subcategory.as_deref(), Some("카페/음료"));
    assert!(result.confidence > 0.5, "confidence {}", result.confidence);
}

#[test]
fn test_salary_is_income() {
    let (record, result) = run("이번 달 월급 받았어 320만원", None);

    assert_eq!(record.direction, Direction::Income);
    assert_eq!(record.amount, 3_200_000);
    assert_eq!(result.category, Category::Income);
    assert_eq!(result.subcategory.as_deref(), Some("급여/월급"));
}

#[test]
fn test_unrecognisable_text_is_other() {
    let (record, result) = run("그냥 메모 남겨둠", None);

    assert_eq!(record.amount, 0);
    assert_eq!(record.merchant_location, None);
    assert_eq!(result.category, Category::Other);
    assert_eq!(result.confidence, FALLBACK_CONFIDENCE);
}

#[test]
fn test_amount_expressions() {
    let extractor = FieldExtractor::new().unwrap();
    for (text, expected) in [
        ("12,000원", 12_000),
        ("5만원", 50_000),
        ("12천원", 12_000),
        ("5만2천원", 52_000),
    ] {
        assert_eq!(extractor.extract(text, now()).amount, expected, "{text}");
    }
}

#[test]
fn test_convenience_store_cash() {
    let (record, result) = run("어제 GS25에서 삼각김밥 1,500원 현금", None);

    assert_eq!(record.payment_method, PaymentMethod::Cash);
    assert_eq!(record.occurs_at.date(), NaiveDate::from_ymd_opt(2026, 3, 13).unwrap());
    assert_eq!(result.category, Category::Food);
    assert_eq!(result.subcategory.as_deref(), Some("편의점"));
}

#[test]
fn test_maintenance_fee_transfer() {
    let (record, result) = run("관리비 15만원 계좌이체", None);

    assert_eq!(record.amount, 150_000);
    assert_eq!(record.payment_method, PaymentMethod::Transfer);
    assert_eq!(result.category, Category::Housing);
    assert_eq!(result.subcategory.as_deref(), Some("월세/관리비"));
}

#[test]
fn test_income_wins_over_expense_evidence() {
    for text in ["중고 판매로 5만원 들어왔다", "스타벅스 알바비 받았어 8만원", "택시비 환불 12000원 입금"] {
        let (_, result) = run(text, Some(&AiHint::new("transport", 1.0)));
        assert_eq!(result.category, Category::Income, "{text}");
    }
}

#[test]
fn test_confidence_stays_in_unit_interval() {
    let extractor = FieldExtractor::new().unwrap();
    let classifiers = [
        Classifier::default(),
        Classifier::new(ClassifierConfig {
            clock_time_evidence: true,
        }),
    ];
    let hints = [None, Some(AiHint::new("food", 1.0)), Some(AiHint::new("other", 7.5))];

    for text in SAMPLES {
        let record = extractor.extract(text, now());
        assert!((0.0..=1.0).contains(&record.extraction_confidence));
        for classifier in &classifiers {
            for hint in &hints {
                let result = classifier.classify(text, &record, hint.as_ref());
                assert!(
                    (0.0..=1.0).contains(&result.confidence),
                    "{text}: {}",
                    result.confidence
                );
                if let Some(sub) = &result.subcategory {
                    assert!(result.category.has_subcategory(sub), "{text}: {sub}");
                }
            }
        }
    }
}

#[test]
fn test_repeated_calls_are_identical() {
    let extractor = FieldExtractor::new().unwrap();
    let classifier = Classifier::default();
    for text in SAMPLES {
        let a = extractor.extract(text, now());
        let b = extractor.extract(text, now());
        assert_eq!(a, b);
        assert_eq!(classifier.classify(text, &a, None), classifier.classify(text, &b, None));
    }
}

#[test]
fn test_extra_keyword_never_lowers_category_score() {
    let extractor = FieldExtractor::new().unwrap();
    let classifier = Classifier::default();
    let score = |text: &str, category: Category| -> f64 {
        let record = extractor.extract(text, now());
        classifier
            .collect_evidence(&record, None)
            .iter()
            .filter(|e| e.category == category)
            .map(|e| e.confidence)
            .sum()
    };

    let pairs = [
        ("택시 12000원", "택시 카카오택시 12000원", Category::Transport),
        ("치킨 2만원", "치킨 배달 2만원", Category::Food),
        ("영화 15000원", "CGV 영화 15000원", Category::Entertainment),
    ];
    for (base, extended, category) in pairs {
        assert!(score(extended, category) >= score(base, category), "{base} -> {extended}");
    }
}

#[test]
fn test_stated_evening_time_adds_evidence() {
    let (record, result) = run("오후 8시 CGV 영화표 2만4천원", None);

    assert_eq!(record.amount, 24_000);
    assert_eq!(result.category, Category::Entertainment);
    assert_eq!(result.subcategory.as_deref(), Some("영화/연극"));
    assert!(result.rationale.iter().any(|r| r.starts_with("time-of-day pattern")));
}
