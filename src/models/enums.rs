//! # 模型枚举类型模块
//!
//! ## 业务作用
//! 本模块定义了校园安防系统使用的各种枚举类型，包括：
//! - **设备枚举**: 摄像头类型、门禁类型、传感器类型与状态
//! - **追踪枚举**: 实体类型、实体角色、定位来源
//! - **告警与事件枚举**: 事件类型、严重程度、告警/事件单状态
//!
//! ## 设计原则
//! - **类型安全**: 使用强类型枚举避免魔法字符串
//! - **统一编码**: 数据库存储值与 JSON 值一致，均为 snake_case 字符串
//! - **字符串转换**: 提供与字符串的双向转换能力
//!
//! ## Rust知识点
//! - **声明宏**: `string_enum!` 为每个枚举生成 SeaORM/serde 派生与 Display/FromStr
//! - **DeriveActiveEnum**: 枚举以字符串列形式存入数据库

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// 生成以字符串存储的枚举
///
/// 每个变体给出其唯一的编码字符串，该字符串同时用于：
/// 数据库列值、JSON 序列化值、`Display` 输出与 `FromStr` 解析
macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $value:tt ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
        #[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[sea_orm(string_value = $value)]
                #[serde(rename = $value)]
                $variant,
            )+
        }

        impl $name {
            /// 编码字符串
            pub fn as_str(&self) -> &'static str {
                match self {
                    $( $name::$variant => $value, )+
                }
            }

            /// 全部取值（按声明顺序）
            pub fn all() -> Vec<Self> {
                <Self as sea_orm::Iterable>::iter().collect()
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $value => Ok($name::$variant), )+
                    _ => Err(format!("Invalid {}: {}", stringify!($name), s)),
                }
            }
        }
    };
}

// ==================== 用户 ====================

string_enum! {
    /// 用户角色
    UserRole {
        User => "user",
        Admin => "admin",
        Operator => "operator",
        Viewer => "viewer",
    }
}

// ==================== 校园结构 ====================

string_enum! {
    /// 区域类型
    ZoneType {
        Classroom => "classroom",
        Hallway => "hallway",
        Stairwell => "stairwell",
        Entry => "entry",
        Office => "office",
        Lab => "lab",
        Common => "common",
        Restroom => "restroom",
        Other => "other",
    }
}

// ==================== 安防设备 ====================

string_enum! {
    /// 摄像头类型
    CameraType {
        Dome => "dome",
        Bullet => "bullet",
        Ptz => "ptz",
        Fisheye => "fisheye",
        Thermal => "thermal",
    }
}

string_enum! {
    /// 设备运行状态（摄像头、门禁、无线AP共用）
    EquipmentStatus {
        Online => "online",
        Offline => "offline",
        Maintenance => "maintenance",
        Error => "error",
    }
}

string_enum! {
    /// 门禁读卡器方向
    AccessReaderType {
        Entry => "entry",
        Exit => "exit",
        Bidirectional => "bidirectional",
    }
}

string_enum! {
    /// 传感器类型
    SensorType {
        Motion => "motion",
        GlassBreak => "glass_break",
        Smoke => "smoke",
        Temperature => "temperature",
        Occupancy => "occupancy",
    }
}

string_enum! {
    /// 传感器状态，比设备状态多一个"已触发"
    SensorStatus {
        Online => "online",
        Offline => "offline",
        Triggered => "triggered",
        Maintenance => "maintenance",
    }
}

// ==================== 追踪 ====================

string_enum! {
    /// 被追踪实体类型
    EntityType {
        Person => "person",
        Device => "device",
        Vehicle => "vehicle",
        Unknown => "unknown",
    }
}

string_enum! {
    /// 被追踪实体在校园中的身份
    EntityRole {
        Staff => "staff",
        Student => "student",
        Visitor => "visitor",
        Contractor => "contractor",
        Unknown => "unknown",
    }
}

string_enum! {
    /// 定位数据来源
    LocationSource {
        Wifi => "wifi",
        Rfid => "rfid",
        Facial => "facial",
        Phone => "phone",
        Motion => "motion",
        Manual => "manual",
    }
}

// ==================== 事件与告警 ====================

string_enum! {
    /// 安防事件类型
    EventType {
        CameraAlert => "camera_alert",
        AccessEntry => "access_entry",
        AccessDenied => "access_denied",
        MotionDetect => "motion_detect",
        WifiProbe => "wifi_probe",
        FacialMatch => "facial_match",
        WeaponDetect => "weapon_detect",
        Anomaly => "anomaly",
        CrowdGather => "crowd_gather",
        PersonDown => "person_down",
        Intrusion => "intrusion",
        System => "system",
    }
}

string_enum! {
    /// 事件严重程度
    Severity {
        Info => "info",
        Low => "low",
        Medium => "medium",
        High => "high",
        Critical => "critical",
    }
}

string_enum! {
    /// 告警类型
    AlertType {
        Weapon => "weapon",
        Intrusion => "intrusion",
        Anomaly => "anomaly",
        Crowd => "crowd",
        AccessViolation => "access_violation",
        System => "system",
        PersonDown => "person_down",
        Fire => "fire",
    }
}

string_enum! {
    /// 告警严重程度
    AlertSeverity {
        Low => "low",
        Medium => "medium",
        High => "high",
        Critical => "critical",
    }
}

string_enum! {
    /// 告警处理状态
    AlertStatus {
        Active => "active",
        Acknowledged => "acknowledged",
        Investigating => "investigating",
        Resolved => "resolved",
        FalseAlarm => "false_alarm",
    }
}

string_enum! {
    /// 事件单状态
    IncidentStatus {
        Open => "open",
        InProgress => "in_progress",
        Resolved => "resolved",
        Closed => "closed",
    }
}

string_enum! {
    /// 事件单优先级
    IncidentPriority {
        Low => "low",
        Medium => "medium",
        High => "high",
        Critical => "critical",
    }
}

// ==================== 派生与展示辅助 ====================

impl AlertSeverity {
    /// 排序优先级：critical=4, high=3, medium=2, low=1
    pub fn priority(&self) -> u8 {
        match self {
            AlertSeverity::Critical => 4,
            AlertSeverity::High => 3,
            AlertSeverity::Medium => 2,
            AlertSeverity::Low => 1,
        }
    }

    /// 按优先级从高到低排序
    pub fn sort_by_priority_desc<T, F>(items: &mut [T], severity_of: F)
    where
        F: Fn(&T) -> AlertSeverity,
    {
        items.sort_by(|a, b| severity_of(b).priority().cmp(&severity_of(a).priority()));
    }
}

impl AlertStatus {
    /// 是否为终结状态（已解决或误报）
    pub fn is_terminal(&self) -> bool {
        matches!(self, AlertStatus::Resolved | AlertStatus::FalseAlarm)
    }
}

impl Default for EquipmentStatus {
    fn default() -> Self {
        Self::Online
    }
}

impl Default for EntityRole {
    fn default() -> Self {
        Self::Unknown
    }
}

/// 风险等级，由实体风险分数派生
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// 分数 ≥80 为高风险，≥50 为中风险，其余为低风险
    pub fn from_score(score: i32) -> Self {
        if score >= 80 {
            RiskLevel::High
        } else if score >= 50 {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}

impl Display for RiskLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        };
        write!(f, "{}", s)
    }
}
