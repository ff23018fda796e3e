use crate::pipeline::domain::BodyTypeCategory;
use indexmap::IndexMap;
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::Serialize;

/// Apparel slot a recommended item fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ApparelCategory {
    Top,
    Bottom,
    Shoes,
    Accessory,
}

impl ApparelCategory {
    pub fn label(&self) -> &'static str {
        match self {
            ApparelCategory::Top => "상의",
            ApparelCategory::Bottom => "하의",
            ApparelCategory::Shoes => "신발",
            ApparelCategory::Accessory => "액세서리",
        }
    }

    /// Identifier the asset loader resolves to a product image.
    pub fn asset_id(&self) -> &'static str {
        match self {
            ApparelCategory::Top => "Fit_T",
            ApparelCategory::Bottom => "S_Jeans",
            ApparelCategory::Shoes => "Sneakers",
            ApparelCategory::Accessory => "Slim1",
        }
    }

    /// Inclusive price range in won.
    pub fn price_range(&self) -> (u32, u32) {
        match self {
            ApparelCategory::Top => (30_000, 80_000),
            ApparelCategory::Bottom => (50_000, 120_000),
            ApparelCategory::Shoes => (80_000, 200_000),
            ApparelCategory::Accessory => (10_000, 50_000),
        }
    }

    pub fn brands(&self) -> &'static [&'static str] {
        match self {
            ApparelCategory::Top => &["UNIQLO", "ZARA", "COS", "MUSINSA", "H&M", "SPAO"],
            ApparelCategory::Bottom => &["LEVI'S", "ZARA", "ADLV", "STONE ISLAND", "UNIQLO"],
            ApparelCategory::Shoes => &["NIKE", "ADIDAS", "CLARKS", "DR.MARTENS", "CONVERSE"],
            ApparelCategory::Accessory => &["CASIO", "SWATCH", "FOSSIL", "SEIKO"],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogItem {
    pub name: &'static str,
    pub reason: &'static str,
    pub apparel: ApparelCategory,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    pub id: usize,
    pub name: String,
    pub reason: String,
    pub apparel: ApparelCategory,
    pub asset_id: String,
    pub price_won: u32,
    pub brand: String,
}

impl Recommendation {
    /// Price with thousands separators, e.g. `45,000원`.
    pub fn price_label(&self) -> String {
        let digits = self.price_won.to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }
        format!("{}원", grouped)
    }
}

/// Fixed outfit suggestions per body type.
#[derive(Debug, Clone)]
pub struct RecommendationCatalog {
    items: IndexMap<BodyTypeCategory, Vec<CatalogItem>>,
}

impl Default for RecommendationCatalog {
    fn default() -> Self {
        use ApparelCategory::*;

        let mut items = IndexMap::new();
        items.insert(
            BodyTypeCategory::Slim,
            vec![
                CatalogItem {
                    name: "오버핏 셔츠",
                    reason: "여유 있는 실루엣이 상체에 볼륨을 더해줍니다",
                    apparel: Top,
                },
                CatalogItem {
                    name: "와이드 팬츠",
                    reason: "하체 라인을 자연스럽게 보완합니다",
                    apparel: Bottom,
                },
                CatalogItem {
                    name: "청키 스니커즈",
                    reason: "전체 비율에 무게감을 줍니다",
                    apparel: Shoes,
                },
            ],
        );
        items.insert(
            BodyTypeCategory::Average,
            vec![
                CatalogItem {
                    name: "베이직 티셔츠",
                    reason: "어떤 하의와도 잘 어울리는 기본 아이템입니다",
                    apparel: Top,
                },
                CatalogItem {
                    name: "슬림 진",
                    reason: "균형 잡힌 체형을 깔끔하게 살려줍니다",
                    apparel: Bottom,
                },
                CatalogItem {
                    name: "메탈 시계",
                    reason: "심플한 코디에 포인트를 더합니다",
                    apparel: Accessory,
                },
            ],
        );
        items.insert(
            BodyTypeCategory::Full,
            vec![
                CatalogItem {
                    name: "브이넥 니트",
                    reason: "세로 라인을 강조해 슬림해 보이게 합니다",
                    apparel: Top,
                },
                CatalogItem {
                    name: "스트레이트 치노 팬츠",
                    reason: "일자 핏이 하체를 정돈해 보이게 합니다",
                    apparel: Bottom,
                },
                CatalogItem {
                    name: "로퍼",
                    reason: "단정한 마무리로 전체 인상을 가볍게 합니다",
                    apparel: Shoes,
                },
            ],
        );
        items.insert(
            BodyTypeCategory::Athletic,
            vec![
                CatalogItem {
                    name: "머슬핏 티셔츠",
                    reason: "어깨와 가슴 라인을 살려줍니다",
                    apparel: Top,
                },
                CatalogItem {
                    name: "테이퍼드 트레이닝 팬츠",
                    reason: "허벅지에 여유를 주면서 발목은 깔끔하게 떨어집니다",
                    apparel: Bottom,
                },
                CatalogItem {
                    name: "러닝화",
                    reason: "활동적인 스타일을 완성합니다",
                    apparel: Shoes,
                },
            ],
        );

        Self { items }
    }
}

impl RecommendationCatalog {
    pub fn items(&self, category: BodyTypeCategory) -> &[CatalogItem] {
        self.items
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Builds the list for `category`; price and brand are drawn from `rng`.
    pub fn recommend<R: Rng>(
        &self,
        category: BodyTypeCategory,
        rng: &mut R,
    ) -> Vec<Recommendation> {
        self.items(category)
            .iter()
            .enumerate()
            .map(|(index, item)| {
                let (min, max) = item.apparel.price_range();
                let brand = item
                    .apparel
                    .brands()
                    .choose(&mut *rng)
                    .copied()
                    .unwrap_or("UNIQLO");
                Recommendation {
                    id: index + 1,
                    name: item.name.to_string(),
                    reason: item.reason.to_string(),
                    apparel: item.apparel,
                    asset_id: item.apparel.asset_id().to_string(),
                    price_won: rng.random_range(min..=max),
                    brand: brand.to_string(),
                }
            })
            .collect()
    }
}
