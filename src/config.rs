use crate::entities::PackType;
use crate::models::{PrizeEntry, SpecialKind};
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub economy: EconomyConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// 经济系统参数: 每次 spin 的保底奖励、当日首次加成、投票奖励、
/// 合作方分成, 以及转盘奖品表。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EconomyConfig {
    #[serde(default = "default_base_spin_reward")]
    pub base_spin_reward: i64,
    #[serde(default = "default_first_spin_bonus")]
    pub first_spin_bonus: i64,
    #[serde(default = "default_vote_reward")]
    pub vote_reward: i64,
    /// 合作商家（机主）的钱包账户；None 表示不分成
    #[serde(default)]
    pub partner_user_id: Option<i64>,
    /// 分成比例 (basis points, 100% = 10000)
    #[serde(default = "default_partner_share_bp")]
    pub partner_share_bp: i64,
    #[serde(default = "default_prizes")]
    pub prizes: Vec<PrizeEntry>,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            base_spin_reward: default_base_spin_reward(),
            first_spin_bonus: default_first_spin_bonus(),
            vote_reward: default_vote_reward(),
            partner_user_id: None,
            partner_share_bp: default_partner_share_bp(),
            prizes: default_prizes(),
        }
    }
}

fn default_base_spin_reward() -> i64 {
    1
}

fn default_first_spin_bonus() -> i64 {
    2
}

fn default_vote_reward() -> i64 {
    1
}

fn default_partner_share_bp() -> i64 {
    2000
}

/// 默认奖品表 (权重合计 100)。权重解释为相对概率质量, 不要求凑整百。
fn default_prizes() -> Vec<PrizeEntry> {
    vec![
        PrizeEntry::new("Jackpot", 5, 1, 500, None),
        PrizeEntry::new("Try Again", 0, 20, 0, None),
        PrizeEntry::new("2 Coins", 1, 15, 2, None),
        PrizeEntry::new("5 Coins", 2, 20, 5, None),
        PrizeEntry::new("Coin Leak", 1, 15, -2, None),
        PrizeEntry::new("10 Coins", 3, 12, 10, None),
        PrizeEntry::new("Free Respin", 2, 10, 0, Some(SpecialKind::Respin)),
        PrizeEntry::new("Avatar Unlock", 4, 7, 0, Some(SpecialKind::Unlock)),
    ]
}

/// 商店目录: 可购买的加次卡与需要生成兑换码的商品。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_packs")]
    pub packs: Vec<PackOffer>,
    #[serde(default = "default_items")]
    pub items: Vec<ItemOffer>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            packs: default_packs(),
            items: default_items(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackOffer {
    pub pack_type: PackType,
    pub units_per_day: i64,
    pub duration_days: i64,
    /// 价格（金币）
    pub price: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemOffer {
    pub key: String,
    pub title: String,
    pub price: i64,
}

fn default_packs() -> Vec<PackOffer> {
    vec![
        PackOffer {
            pack_type: PackType::Spin,
            units_per_day: 3,
            duration_days: 7,
            price: 300,
        },
        PackOffer {
            pack_type: PackType::Vote,
            units_per_day: 2,
            duration_days: 7,
            price: 200,
        },
    ]
}

fn default_items() -> Vec<ItemOffer> {
    vec![ItemOffer {
        key: "discount_qr_5".to_string(),
        title: "5% machine discount code".to_string(),
        price: 500,
    }]
}

impl Config {
    pub fn from_toml() -> Result<Self, Box<dyn std::error::Error>> {
        let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        use std::io::ErrorKind;

        // 尝试读取配置文件，如果不存在则完全依赖环境变量
        let config_result = std::fs::read_to_string(&config_path);

        let mut config: Config = match config_result {
            Ok(config_str) => {
                // 有配置文件：先解析再用环境变量覆盖
                toml::from_str(&config_str).map_err(|e| format!("解析配置文件失败: {e}"))?
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                // 无配置文件：使用环境变量与默认值构建
                fn get_env(name: &str) -> Option<String> {
                    env::var(name).ok()
                }
                fn get_env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
                    env::var(name)
                        .ok()
                        .and_then(|v| v.parse::<T>().ok())
                        .unwrap_or(default)
                }

                // 数据库 URL 在无配置文件时必须提供
                let database_url = get_env("DATABASE_URL")
                    .ok_or("缺少 DATABASE_URL 环境变量，且未找到配置文件 config.toml")?;

                Config {
                    server: ServerConfig {
                        host: get_env("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                        port: get_env_parse("SERVER_PORT", 8080u16),
                    },
                    database: DatabaseConfig {
                        url: database_url,
                        max_connections: get_env_parse("DB_MAX_CONNECTIONS", 10u32),
                    },
                    economy: EconomyConfig::default(),
                    store: StoreConfig::default(),
                }
            }
            Err(e) => {
                return Err(format!("无法读取配置文件 {config_path}: {e}").into());
            }
        };

        // 环境变量覆盖（即便文件存在时也覆盖）
        if let Ok(v) = env::var("SERVER_HOST") {
            config.server.host = v;
        }
        if let Ok(v) = env::var("SERVER_PORT")
            && let Ok(p) = v.parse()
        {
            config.server.port = p;
        }
        if let Ok(v) = env::var("DATABASE_URL") {
            config.database.url = v;
        }
        if let Ok(v) = env::var("DB_MAX_CONNECTIONS")
            && let Ok(mc) = v.parse()
        {
            config.database.max_connections = mc;
        }
        if let Ok(v) = env::var("PARTNER_USER_ID")
            && let Ok(id) = v.parse()
        {
            config.economy.partner_user_id = Some(id);
        }
        if let Ok(v) = env::var("PARTNER_SHARE_BP")
            && let Ok(bp) = v.parse()
        {
            config.economy.partner_share_bp = bp;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_prize_weights_sum() {
        let total: u64 = default_prizes().iter().map(|p| p.weight as u64).sum();
        assert_eq!(total, 100);
    }

    #[test]
    fn test_store_defaults_have_spin_pack() {
        let store = StoreConfig::default();
        assert!(store.packs.iter().any(|p| p.pack_type == PackType::Spin));
        assert!(store.packs.iter().all(|p| p.price > 0));
    }
}
