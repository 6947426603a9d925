//! Budget category taxonomy.
//!
//! The category set is closed: every category is a [`Category`] variant and
//! its metadata lives in the read-only [`TAXONOMY`] table, indexed by
//! variant. Iteration always goes through [`Category::ALL`], whose order is
//! the declaration order used for tie-breaking during classification.

use serde::{Deserialize, Serialize};

/// Budget categories in declaration order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    #[serde(rename = "food")]
    Food,
    #[serde(rename = "transport")]
    Transport,
    #[serde(rename = "entertainment")]
    Entertainment,
    #[serde(rename = "shopping")]
    Shopping,
    #[serde(rename = "healthcare")]
    Healthcare,
    #[serde(rename = "education")]
    Education,
    #[serde(rename = "utilities")]
    Utilities,
    #[serde(rename = "housing")]
    Housing,
    #[serde(rename = "income")]
    Income,
    #[serde(rename = "other")]
    Other,
}

/// Keywords that point at one subcategory (or at the category only).
#[derive(Debug)]
pub struct KeywordGroup {
    pub subcategory: Option<&'static str>,
    pub keywords: &'static [&'static str],
}

/// Static metadata for one category.
#[derive(Debug)]
pub struct CategoryInfo {
    pub category: Category,
    /// Display name shown to the user
    pub name: &'static str,
    /// Ordered subcategory labels; a label may hold several `/`-separated tokens
    pub subcategories: &'static [&'static str],
    pub keyword_groups: &'static [KeywordGroup],
    /// Typical amount in KRW, used as a prior by amount-range evidence
    pub average_amount: Option<u64>,
}

impl Category {
    /// All categories in fixed declaration order.
    pub const ALL: [Category; 10] = [
        Category::Food,
        Category::Transport,
        Category::Entertainment,
        Category::Shopping,
        Category::Healthcare,
        Category::Education,
        Category::Utilities,
        Category::Housing,
        Category::Income,
        Category::Other,
    ];

    /// Position in [`Category::ALL`] and [`TAXONOMY`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// Stable identifier, identical to the serde name.
    pub fn id(self) -> &'static str {
        match self {
            Category::Food => "food",
            Category::Transport => "transport",
            Category::Entertainment => "entertainment",
            Category::Shopping => "shopping",
            Category::Healthcare => "healthcare",
            Category::Education => "education",
            Category::Utilities => "utilities",
            Category::Housing => "housing",
            Category::Income => "income",
            Category::Other => "other",
        }
    }

    pub fn info(self) -> &'static CategoryInfo {
        &TAXONOMY[self.index()]
    }

    pub fn name(self) -> &'static str {
        self.info().name
    }

    pub fn subcategories(self) -> &'static [&'static str] {
        self.info().subcategories
    }

    pub fn average_amount(self) -> Option<u64> {
        self.info().average_amount
    }

    /// Flattened keyword list, group by group.
    pub fn keywords(self) -> impl Iterator<Item = &'static str> {
        self.info()
            .keyword_groups
            .iter()
            .flat_map(|g| g.keywords.iter().copied())
    }

    /// Subcategory of the group that declares `keyword`, if any.
    pub fn keyword_subcategory(self, keyword: &str) -> Option<&'static str> {
        self.info()
            .keyword_groups
            .iter()
            .find(|g| g.keywords.contains(&keyword))
            .and_then(|g| g.subcategory)
    }

    pub fn has_subcategory(self, label: &str) -> bool {
        self.subcategories().contains(&label)
    }

    pub fn is_income(self) -> bool {
        self == Category::Income
    }

    /// Resolve a category by stable id (case-insensitive) or display name.
    pub fn from_name(name: &str) -> Option<Category> {
        let name = name.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.id().eq_ignore_ascii_case(name) || c.name() == name)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Category metadata, indexed by [`Category::index`].
pub static TAXONOMY: [CategoryInfo; 10] = [
    CategoryInfo {
        category: Category::Food,
        name: "식비",
        subcategories: &[
            "카페/음료",
            "식당/외식",
            "배달음식",
            "편의점",
            "마트/식재료",
            "술집/주점",
            "베이커리",
            "디저트",
        ],
        keyword_groups: &[
            KeywordGroup {
                subcategory: Some("카페/음료"),
                keywords: &[
                    "스타벅스", "투썸플레이스", "이디야", "폴바셋", "할리스", "커피빈", "카페",
                    "아메리카노", "라떼", "에스프레소", "프라푸치노", "음료",
                ],
            },
            KeywordGroup {
                subcategory: Some("식당/외식"),
                keywords: &[
                    "김치찌개", "된장찌개", "불고기", "삼겹살", "치킨", "피자", "햄버거", "초밥",
                    "파스타", "스테이크", "족발", "보쌈", "곱창", "마라탕", "쌀국수", "떡볶이",
                    "맥도날드", "버거킹", "KFC", "롯데리아", "서브웨이",
                ],
            },
            KeywordGroup {
                subcategory: Some("배달음식"),
                keywords: &["배달의민족", "요기요", "쿠팡이츠", "배달", "중국집", "야식"],
            },
            KeywordGroup {
                subcategory: Some("편의점"),
                keywords: &["GS25", "CU", "세븐일레븐", "이마트24", "편의점", "도시락", "삼각김밥"],
            },
            KeywordGroup {
                subcategory: Some("마트/식재료"),
                keywords: &["이마트", "홈플러스", "롯데마트", "코스트코", "마트", "장보기", "식재료"],
            },
        ],
        average_amount: Some(15_000),
    },
    CategoryInfo {
        category: Category::Transport,
        name: "교통비",
        subcategories: &[
            "지하철/버스",
            "택시/우버",
            "기차/고속버스",
            "항공료",
            "주차비",
            "톨게이트",
            "자동차관리",
            "대중교통",
        ],
        keyword_groups: &[
            KeywordGroup {
                subcategory: Some("지하철/버스"),
                keywords: &["지하철", "버스", "T머니", "교통카드"],
            },
            KeywordGroup {
                subcategory: Some("택시/우버"),
                keywords: &["택시", "카카오택시", "우버"],
            },
            KeywordGroup {
                subcategory: Some("기차/고속버스"),
                keywords: &["KTX", "무궁화호", "고속버스", "시외버스"],
            },
            KeywordGroup {
                subcategory: Some("항공료"),
                keywords: &["항공", "비행기"],
            },
            KeywordGroup {
                subcategory: Some("주차비"),
                keywords: &["주차", "주차비"],
            },
            KeywordGroup {
                subcategory: Some("톨게이트"),
                keywords: &["톨게이트", "하이패스"],
            },
            KeywordGroup {
                subcategory: Some("자동차관리"),
                keywords: &["기름값", "주유소", "SK에너지", "GS칼텍스", "S-Oil", "현대오일뱅크"],
            },
        ],
        average_amount: Some(5_000),
    },
    CategoryInfo {
        category: Category::Entertainment,
        name: "문화생활",
        subcategories: &[
            "영화/연극",
            "콘서트/공연",
            "게임/오락",
            "스포츠/운동",
            "독서",
            "여행/숙박",
            "노래방",
            "볼링/당구",
        ],
        keyword_groups: &[
            KeywordGroup {
                subcategory: Some("영화/연극"),
                keywords: &["CGV", "롯데시네마", "메가박스", "영화", "영화표", "팝콘", "연극", "뮤지컬"],
            },
            KeywordGroup {
                subcategory: Some("게임/오락"),
                keywords: &["스팀", "PlayStation", "Xbox", "닌텐도", "PC방", "오락실", "게임"],
            },
            KeywordGroup {
                subcategory: Some("스포츠/운동"),
                keywords: &["헬스장", "피트니스", "수영장", "골프", "테니스", "클라이밍", "요가", "필라테스"],
            },
            KeywordGroup {
                subcategory: Some("여행/숙박"),
                keywords: &["호텔", "펜션", "에어비앤비", "모텔", "숙박", "여행", "관광"],
            },
            KeywordGroup {
                subcategory: Some("노래방"),
                keywords: &["노래방"],
            },
            KeywordGroup {
                subcategory: Some("볼링/당구"),
                keywords: &["볼링장", "당구장"],
            },
            KeywordGroup {
                subcategory: None,
                keywords: &["찜질방", "스파"],
            },
        ],
        average_amount: Some(25_000),
    },
    CategoryInfo {
        category: Category::Shopping,
        name: "쇼핑",
        subcategories: &[
            "의류/패션",
            "화장품/뷰티",
            "전자제품",
            "생활용품",
            "온라인쇼핑",
            "서적/문구",
            "선물/기념품",
            "신발/가방",
        ],
        keyword_groups: &[
            KeywordGroup {
                subcategory: Some("의류/패션"),
                keywords: &["유니클로", "H&M", "ZARA", "무신사", "29CM", "브랜디", "옷", "의류"],
            },
            KeywordGroup {
                subcategory: Some("화장품/뷰티"),
                keywords: &["올리브영", "롭스", "아리따움", "미샤", "더페이스샵", "이니스프리", "화장품"],
            },
            KeywordGroup {
                subcategory: Some("전자제품"),
                keywords: &["삼성", "LG", "애플", "아이폰", "갤럭시", "맥북", "아이패드", "전자제품"],
            },
            KeywordGroup {
                subcategory: Some("온라인쇼핑"),
                keywords: &["쿠팡", "11번가", "G마켓", "옥션", "티몬", "SSG", "네이버쇼핑", "온라인"],
            },
            KeywordGroup {
                subcategory: Some("생활용품"),
                keywords: &["다이소", "아트박스", "텐바이텐", "무료배송", "생활용품", "인테리어"],
            },
        ],
        average_amount: Some(35_000),
    },
    CategoryInfo {
        category: Category::Healthcare,
        name: "의료/건강",
        subcategories: &[
            "병원/의원",
            "약국",
            "건강검진",
            "치과",
            "한의원",
            "안경/렌즈",
            "건강식품",
            "의료기기",
        ],
        keyword_groups: &[
            KeywordGroup {
                subcategory: Some("병원/의원"),
                keywords: &["병원", "의원", "클리닉", "응급실", "의료비"],
            },
            KeywordGroup {
                subcategory: Some("약국"),
                keywords: &["약국", "처방전"],
            },
            KeywordGroup {
                subcategory: Some("건강검진"),
                keywords: &["건강검진"],
            },
            KeywordGroup {
                subcategory: Some("치과"),
                keywords: &["치과"],
            },
            KeywordGroup {
                subcategory: Some("한의원"),
                keywords: &["한의원", "한약"],
            },
            KeywordGroup {
                subcategory: Some("안경/렌즈"),
                keywords: &["안경", "렌즈"],
            },
            KeywordGroup {
                subcategory: Some("건강식품"),
                keywords: &["건강기능식품", "비타민", "영양제"],
            },
            KeywordGroup {
                subcategory: None,
                keywords: &["헬스케어"],
            },
        ],
        average_amount: Some(20_000),
    },
    CategoryInfo {
        category: Category::Education,
        name: "교육/학습",
        subcategories: &[
            "온라인강의",
            "학원/과외",
            "도서/전자책",
            "어학학습",
            "자격증",
            "세미나/워크샵",
            "구독서비스",
            "문구/학용품",
        ],
        keyword_groups: &[
            KeywordGroup {
                subcategory: Some("온라인강의"),
                keywords: &["인프런", "유데미", "패스트캠퍼스", "클래스101", "온라인강의", "강의"],
            },
            KeywordGroup {
                subcategory: Some("학원/과외"),
                keywords: &["학원", "과외"],
            },
            KeywordGroup {
                subcategory: Some("어학학습"),
                keywords: &["토익", "토플", "영어", "중국어", "일본어"],
            },
            KeywordGroup {
                subcategory: Some("도서/전자책"),
                keywords: &["교보문고", "예스24", "알라딘", "도서", "책", "전자책"],
            },
            KeywordGroup {
                subcategory: Some("자격증"),
                keywords: &["자격증", "시험"],
            },
            KeywordGroup {
                subcategory: Some("세미나/워크샵"),
                keywords: &["세미나", "워크샵", "컨퍼런스"],
            },
        ],
        average_amount: Some(50_000),
    },
    CategoryInfo {
        category: Category::Utilities,
        name: "공과금/정기결제",
        subcategories: &[
            "전기/가스/수도",
            "인터넷/통신",
            "구독서비스",
            "보험료",
            "멤버십",
            "클라우드저장소",
            "스트리밍서비스",
            "기타정기결제",
        ],
        keyword_groups: &[
            KeywordGroup {
                subcategory: Some("전기/가스/수도"),
                keywords: &["한국전력", "도시가스", "수도요금", "전기요금", "가스비", "수도비"],
            },
            KeywordGroup {
                subcategory: Some("인터넷/통신"),
                keywords: &["SKT", "KT", "LG유플러스", "휴대폰요금", "인터넷요금", "와이파이"],
            },
            KeywordGroup {
                subcategory: Some("스트리밍서비스"),
                keywords: &[
                    "넷플릭스", "디즈니플러스", "티빙", "웨이브", "왓챠", "멜론", "지니", "스포티파이",
                    "유튜브프리미엄",
                ],
            },
            KeywordGroup {
                subcategory: Some("클라우드저장소"),
                keywords: &["구글드라이브", "아이클라우드", "드롭박스"],
            },
            KeywordGroup {
                subcategory: Some("보험료"),
                keywords: &["보험료"],
            },
            KeywordGroup {
                subcategory: Some("멤버십"),
                keywords: &["멤버십", "연회비"],
            },
            KeywordGroup {
                subcategory: Some("기타정기결제"),
                keywords: &["정기결제", "구독"],
            },
        ],
        average_amount: Some(30_000),
    },
    CategoryInfo {
        category: Category::Housing,
        name: "주거비",
        subcategories: &[
            "월세/관리비",
            "인테리어/가구",
            "가전제품",
            "청소/세탁",
            "수리/보수",
            "이사비용",
            "보증금",
            "부동산수수료",
        ],
        keyword_groups: &[
            KeywordGroup {
                subcategory: Some("월세/관리비"),
                keywords: &["월세", "관리비", "전세"],
            },
            KeywordGroup {
                subcategory: Some("보증금"),
                keywords: &["보증금"],
            },
            KeywordGroup {
                subcategory: Some("부동산수수료"),
                keywords: &["부동산"],
            },
            KeywordGroup {
                subcategory: Some("이사비용"),
                keywords: &["이사", "용달"],
            },
            KeywordGroup {
                subcategory: Some("인테리어/가구"),
                keywords: &["이케아", "한샘", "가구", "침대", "소파", "책상", "의자"],
            },
            KeywordGroup {
                subcategory: Some("가전제품"),
                keywords: &["냉장고", "세탁기", "에어컨", "청소기", "전자레인지"],
            },
            KeywordGroup {
                subcategory: Some("청소/세탁"),
                keywords: &["청소", "세탁소"],
            },
            KeywordGroup {
                subcategory: Some("수리/보수"),
                keywords: &["수리", "보수", "리모델링"],
            },
        ],
        average_amount: Some(100_000),
    },
    CategoryInfo {
        category: Category::Income,
        name: "수입",
        subcategories: &[
            "급여/월급",
            "부업/투잡",
            "용돈/선물",
            "상여금/보너스",
            "투자수익",
            "판매수익",
            "프리랜서",
            "기타수입",
        ],
        // Also the income subcategory resolution table: first group with a hit wins.
        keyword_groups: &[
            KeywordGroup {
                subcategory: Some("급여/월급"),
                keywords: &["월급", "급여", "연봉", "임금"],
            },
            KeywordGroup {
                subcategory: Some("부업/투잡"),
                keywords: &["부업", "투잡", "알바", "아르바이트"],
            },
            KeywordGroup {
                subcategory: Some("용돈/선물"),
                keywords: &["용돈", "선물받은", "생일선물", "축의금"],
            },
            KeywordGroup {
                subcategory: Some("상여금/보너스"),
                keywords: &["상여금", "보너스", "성과급", "인센티브", "수당"],
            },
            KeywordGroup {
                subcategory: Some("투자수익"),
                keywords: &["주식", "투자", "수익", "배당", "펀드"],
            },
            KeywordGroup {
                subcategory: Some("판매수익"),
                keywords: &["판매", "중고", "팔았", "경매"],
            },
            KeywordGroup {
                subcategory: Some("프리랜서"),
                keywords: &["프리랜서", "외주"],
            },
        ],
        average_amount: Some(2_500_000),
    },
    CategoryInfo {
        category: Category::Other,
        name: "기타",
        subcategories: &[
            "미분류",
            "기부/후원",
            "벌금/과태료",
            "은행수수료",
            "ATM수수료",
            "기타지출",
            "분실/도난",
            "예상치못한지출",
        ],
        keyword_groups: &[
            KeywordGroup {
                subcategory: Some("미분류"),
                keywords: &["기타", "미분류", "모름"],
            },
            KeywordGroup {
                subcategory: Some("기부/후원"),
                keywords: &["기부", "후원"],
            },
            KeywordGroup {
                subcategory: Some("벌금/과태료"),
                keywords: &["벌금", "과태료"],
            },
            KeywordGroup {
                subcategory: Some("은행수수료"),
                keywords: &["수수료", "은행"],
            },
            KeywordGroup {
                subcategory: Some("ATM수수료"),
                keywords: &["ATM"],
            },
            KeywordGroup {
                subcategory: Some("분실/도난"),
                keywords: &["분실", "도난"],
            },
            KeywordGroup {
                subcategory: Some("기타지출"),
                keywords: &["기타지출"],
            },
        ],
        average_amount: Some(10_000),
    },
];
