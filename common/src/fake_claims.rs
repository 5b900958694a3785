//! 誤情報テーブル照合
//!
//! 既知の誤った主張を大文字小文字を無視した部分一致で検出し、訂正文を返す。
//! 言い回しが異なる主張は検出しない。

use serde::{Deserialize, Serialize};

/// ローカル一致の信頼度
pub const MATCH_CONFIDENCE: f64 = 0.95;

/// 誤情報テーブルのエントリ
#[derive(Debug, Clone, Copy)]
pub struct FakeClaim {
    pub false_claim: &'static str,
    pub correction: &'static str,
    pub category: &'static str,
}

/// 検出結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FakeClaimMatch {
    pub fake: String,
    pub correct: String,
    pub category: String,
    pub confidence: f64,
}

impl From<&FakeClaim> for FakeClaimMatch {
    fn from(claim: &FakeClaim) -> Self {
        Self {
            fake: claim.false_claim.to_string(),
            correct: claim.correction.to_string(),
            category: claim.category.to_string(),
            confidence: MATCH_CONFIDENCE,
        }
    }
}

/// 既知の誤情報（順序付き）
pub const FAKE_CLAIMS: &[FakeClaim] = &[
    FakeClaim {
        false_claim: "Les fichiers JavaScript s'exécutent directement côté serveur par défaut.",
        correction: "Le JavaScript s'exécute nativement côté navigateur. Pour l'exécuter côté serveur, il faut un environnement comme Node.js.",
        category: "technologie",
    },
    FakeClaim {
        false_claim: "Les Vikings portaient des casques à cornes.",
        correction: "Aucun casque à cornes n'a été retrouvé, c'est une invention romantique du XIXe siècle.",
        category: "histoire",
    },
    FakeClaim {
        false_claim: "Napoléon était très petit.",
        correction: "Il mesurait environ 1,68 m, ce qui était dans la moyenne de son époque.",
        category: "histoire",
    },
    FakeClaim {
        false_claim: "Les chameaux stockent de l'eau dans leurs bosses.",
        correction: "Les bosses stockent de la graisse, pas de l'eau.",
        category: "science",
    },
    FakeClaim {
        false_claim: "Christophe Colomb a prouvé que la Terre était ronde.",
        correction: "Les savants savaient déjà que la Terre était ronde depuis l'Antiquité.",
        category: "histoire",
    },
    FakeClaim {
        false_claim: "Les pyramides d'Égypte ont été construites par des esclaves.",
        correction: "Elles ont été construites par des ouvriers rémunérés et bien nourris.",
        category: "histoire",
    },
    FakeClaim {
        false_claim: "Les taureaux deviennent furieux en voyant la couleur rouge.",
        correction: "Les taureaux sont daltoniens au rouge ; c'est le mouvement de la cape qui les excite.",
        category: "science",
    },
    FakeClaim {
        false_claim: "La muraille de Chine est visible depuis la Lune.",
        correction: "Elle n'est pas visible à l'œil nu depuis la Lune.",
        category: "géographie",
    },
    FakeClaim {
        false_claim: "Les éclairs ne frappent jamais deux fois au même endroit.",
        correction: "Ils frappent souvent plusieurs fois au même endroit, surtout sur des structures hautes.",
        category: "science",
    },
    FakeClaim {
        false_claim: "Les humains utilisent seulement 10 % de leur cerveau.",
        correction: "Nous utilisons toutes les parties du cerveau, mais pas toutes en même temps.",
        category: "science",
    },
    FakeClaim {
        false_claim: "Les carottes rendent la vue parfaite.",
        correction: "Elles aident à maintenir une bonne santé oculaire grâce à la vitamine A, mais ne donnent pas une vision surhumaine.",
        category: "santé",
    },
];

/// テキスト中の既知の誤情報を検出（テーブル順）
pub fn detect_fake_claims(text: &str) -> Vec<FakeClaimMatch> {
    let lower = text.to_lowercase();
    FAKE_CLAIMS
        .iter()
        .filter(|claim| lower.contains(&claim.false_claim.to_lowercase()))
        .map(FakeClaimMatch::from)
        .collect()
}
