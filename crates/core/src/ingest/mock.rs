//! Deterministic stand-in for a real monthly sales feed.
//!
//! Figures are pseudo-random but fully determined by `(month, nation)`, so
//! the same request always ranks the same way.

use crate::domain::radar::{Nation, SalesRecord};
use crate::ingest::provider::SalesDataSource;
use crate::ingest::types::MonthlySales;
use crate::time::month::Month;
use anyhow::Result;

/// Share of catalogue models that report no sales in a given month.
const ABSENT_RATE: f64 = 0.06;

const DOMESTIC_CATALOGUE: &[(&str, &[&str])] = &[
    (
        "현대",
        &[
            "아반떼", "쏘나타", "그랜저", "투싼", "싼타페", "팰리세이드", "코나", "아이오닉5",
            "아이오닉6", "캐스퍼", "스타리아",
        ],
    ),
    (
        "기아",
        &[
            "K3", "K5", "K8", "K9", "셀토스", "스포티지", "쏘렌토", "카니발", "EV6", "EV9", "니로",
            "모닝", "레이",
        ],
    ),
    ("제네시스", &["G70", "G80", "G90", "GV60", "GV70", "GV80"]),
    (
        "쉐보레",
        &["트레일블레이저", "이쿼녹스", "트래버스", "타호", "볼트EUV", "스파크", "말리부"],
    ),
    ("르노코리아", &["QM6", "XM3", "SM6", "마스터", "아르카나"]),
    ("KG모빌리티", &["토레스", "액티언", "코란도", "렉스턴", "티볼리"]),
];

const IMPORT_CATALOGUE: &[(&str, &[&str])] = &[
    ("BMW", &["3시리즈", "5시리즈", "7시리즈", "X3", "X5", "X7", "iX", "i4", "i7"]),
    ("벤츠", &["C클래스", "E클래스", "S클래스", "GLC", "GLE", "GLS", "EQE", "EQS"]),
    ("아우디", &["A4", "A6", "A8", "Q3", "Q5", "Q7", "Q8", "e-tron"]),
    ("폭스바겐", &["골프", "티구안", "투아렉", "ID.4", "아테온", "파사트"]),
    ("볼보", &["S60", "S90", "XC40", "XC60", "XC90", "EX30", "EX90"]),
    ("렉서스", &["ES", "LS", "NX", "RX", "UX", "LX"]),
    ("토요타", &["캠리", "프리우스", "RAV4", "하이랜더", "크라운"]),
    ("혼다", &["어코드", "시빅", "CR-V", "HR-V", "파일럿"]),
    ("포르쉐", &["911", "카이엔", "마칸", "타이칸", "파나메라"]),
    ("랜드로버", &["디펜더", "레인지로버", "레인지로버스포츠", "디스커버리"]),
    ("재규어", &["XE", "XF", "F-PACE", "E-PACE", "I-PACE"]),
    ("미니", &["쿠퍼", "컨트리맨", "클럽맨"]),
    ("푸조", &["208", "308", "3008", "5008"]),
    ("지프", &["랭글러", "그랜드체로키", "컴패스", "글래디에이터"]),
];

#[derive(Debug, Clone, Copy, Default)]
pub struct MockSalesSource;

#[async_trait::async_trait]
impl SalesDataSource for MockSalesSource {
    fn source_name(&self) -> &'static str {
        "mock"
    }

    async fn fetch_month_sales(&self, month: Month, nation: Nation) -> Result<MonthlySales> {
        Ok(generate_month_sales(month, nation))
    }
}

fn catalogue(nation: Nation) -> &'static [(&'static str, &'static [&'static str])] {
    match nation {
        Nation::Domestic => DOMESTIC_CATALOGUE,
        Nation::Export => IMPORT_CATALOGUE,
    }
}

/// Link to the public registration statistics page for `month`.
pub fn statistics_url(month: Month, nation: Nation) -> String {
    format!("https://auto.danawa.com/auto/?Month={month}-00&Nation={nation}&Tab=Model&Work=record")
}

/// Linear congruential generator seeded from a string hash.
struct SeededRng {
    state: i64,
}

impl SeededRng {
    fn from_seed(seed: &str) -> Self {
        let mut h: i32 = 0;
        for b in seed.bytes() {
            h = h.wrapping_shl(5).wrapping_sub(h).wrapping_add(i32::from(b));
        }
        Self {
            state: i64::from(h),
        }
    }

    /// Uniform in `[0, 1]`.
    fn next_f64(&mut self) -> f64 {
        self.state = self
            .state
            .wrapping_mul(1_103_515_245)
            .wrapping_add(12_345)
            & 0x7fff_ffff;
        self.state as f64 / 0x7fff_ffff as f64
    }
}

pub fn generate_month_sales(month: Month, nation: Nation) -> MonthlySales {
    let mut rng = SeededRng::from_seed(&format!("{}{}", month.compact(), nation));
    let (spread, floor) = match nation {
        Nation::Domestic => (8000.0, 500),
        Nation::Export => (3000.0, 100),
    };
    let url = statistics_url(month, nation);

    let mut records = Vec::new();
    for (brand, models) in catalogue(nation) {
        for model_name in *models {
            let present = rng.next_f64() >= ABSENT_RATE;
            let sales = (rng.next_f64() * spread).floor() as u64 + floor;
            if !present {
                continue;
            }
            records.push(SalesRecord {
                brand: brand.to_string(),
                model_name: model_name.to_string(),
                sales,
                original_url: Some(url.clone()),
            });
        }
    }

    MonthlySales {
        month,
        nation,
        records,
    }
}
