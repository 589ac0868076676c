//! 图表模型
//!
//! 定义图表的视觉配置、数据集以及每个指数的图表状态

use serde::{Serialize, Serializer};

/// RGBA 颜色
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// 同色，替换透明度
    pub fn with_alpha(self, a: f64) -> Self {
        Self { a, ..self }
    }

    /// CSS 颜色字符串：不透明时输出 `#rrggbb`，否则输出 `rgba(...)`
    pub fn to_css(&self) -> String {
        if self.a >= 1.0 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
        }
    }
}

impl Serialize for Rgba {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_css())
    }
}

/// 上涨颜色
pub const COLOR_UP: Rgba = Rgba::rgb(0x2e, 0xbd, 0x85);
/// 下跌颜色
pub const COLOR_DOWN: Rgba = Rgba::rgb(0xf6, 0x46, 0x5d);
/// 填充渐变顶部透明度
pub const FILL_ALPHA: f64 = 0.2;

/// 涨跌方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sign {
    Positive,
    Negative,
}

impl Sign {
    /// 当前价不低于前收盘价即为上涨；任一值为 NaN 时视为下跌
    pub fn of(current: f64, previous_close: f64) -> Self {
        if current >= previous_close {
            Sign::Positive
        } else {
            Sign::Negative
        }
    }

    pub fn color(self) -> Rgba {
        match self {
            Sign::Positive => COLOR_UP,
            Sign::Negative => COLOR_DOWN,
        }
    }

    /// 文字样式类名
    pub fn text_class(self) -> &'static str {
        match self {
            Sign::Positive => "text-up",
            Sign::Negative => "text-down",
        }
    }

    pub fn is_positive(self) -> bool {
        self == Sign::Positive
    }
}

// ==================== 视觉配置 ====================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FontStyle {
    pub family: String,
    pub size: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisStyle {
    /// 是否显示坐标轴
    pub display: bool,
    /// 坐标轴位置
    pub position: String,
    /// 是否显示网格线
    pub grid_display: bool,
    pub grid_color: Option<Rgba>,
    pub tick_color: Option<Rgba>,
    pub tick_font: Option<FontStyle>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TooltipStyle {
    pub mode: String,
    pub intersect: bool,
    pub background_color: Rgba,
    pub title_color: Rgba,
    pub body_color: Rgba,
    pub border_color: Rgba,
    pub border_width: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionStyle {
    pub mode: String,
    pub axis: String,
    pub intersect: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PointStyle {
    pub radius: f64,
    pub hover_radius: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineStyle {
    /// 曲线张力，0 为折线
    pub tension: f64,
    pub border_width: f64,
}

/// 图表视觉配置
///
/// 所有图表共用同一份基础配置，但每个图表持有各自独立的副本
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartStyle {
    pub legend: bool,
    pub tooltip: TooltipStyle,
    pub x_axis: AxisStyle,
    pub y_axis: AxisStyle,
    pub interaction: InteractionStyle,
    pub point: PointStyle,
    pub line: LineStyle,
    /// 动画时长（毫秒）
    pub animation_duration: u32,
}

impl ChartStyle {
    /// 构造基础视觉配置
    ///
    /// 隐藏 X 轴与图例，Y 轴靠右，平滑曲线，仅悬停时显示数据点，无动画
    pub fn base() -> Self {
        let muted = Rgba::rgb(0x8b, 0x92, 0xa5);

        Self {
            legend: false,
            tooltip: TooltipStyle {
                mode: "index".to_string(),
                intersect: false,
                background_color: Rgba::rgba(23, 25, 30, 0.9),
                title_color: muted,
                body_color: Rgba::rgb(0xff, 0xff, 0xff),
                border_color: Rgba::rgba(255, 255, 255, 0.1),
                border_width: 1,
            },
            x_axis: AxisStyle {
                display: false,
                position: "bottom".to_string(),
                grid_display: false,
                grid_color: None,
                tick_color: None,
                tick_font: None,
            },
            y_axis: AxisStyle {
                display: true,
                position: "right".to_string(),
                grid_display: true,
                grid_color: Some(Rgba::rgba(255, 255, 255, 0.05)),
                tick_color: Some(muted),
                tick_font: Some(FontStyle {
                    family: "'JetBrains Mono', monospace".to_string(),
                    size: 11,
                }),
            },
            interaction: InteractionStyle {
                mode: "nearest".to_string(),
                axis: "x".to_string(),
                intersect: false,
            },
            point: PointStyle {
                radius: 0.0,
                hover_radius: 6.0,
            },
            line: LineStyle {
                tension: 0.4,
                border_width: 2.0,
            },
            animation_duration: 0,
        }
    }
}

// ==================== 数据集 ====================

/// 渐变色标
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorStop {
    pub offset: f64,
    pub color: Rgba,
}

/// 面积填充
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Fill {
    Solid { color: Rgba },
    /// 竖直线性渐变，从 y0 到 y1（像素）
    LinearGradient { y0: f64, y1: f64, stops: Vec<ColorStop> },
}

impl Fill {
    /// 由某一颜色生成自上而下淡出的渐变
    pub fn fade(color: Rgba, height: f64) -> Self {
        Fill::LinearGradient {
            y0: 0.0,
            y1: height,
            stops: vec![
                ColorStop { offset: 0.0, color: color.with_alpha(FILL_ALPHA) },
                ColorStop { offset: 1.0, color: color.with_alpha(0.0) },
            ],
        }
    }
}

/// 图表数据集
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub label: String,
    pub data: Vec<f64>,
    pub border_color: Rgba,
    pub background: Fill,
    pub fill: bool,
}

/// 绘图画布
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Surface {
    pub id: String,
    pub width: u32,
    pub height: u32,
}

/// 单个指数的图表状态
///
/// 仅由图表渲染器修改；标签与数据长度始终一致
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartState {
    surface: Surface,
    style: ChartStyle,
    labels: Vec<String>,
    dataset: Dataset,
}

impl ChartState {
    pub fn new(surface: Surface, style: ChartStyle, dataset: Dataset) -> Self {
        let labels = vec![String::new(); dataset.data.len()];
        Self { surface, style, labels, dataset }
    }

    /// 替换价格序列，同时重建等长的占位标签
    pub fn set_series(&mut self, prices: Vec<f64>) {
        self.labels = vec![String::new(); prices.len()];
        self.dataset.data = prices;
    }

    pub fn set_colors(&mut self, border: Rgba, background: Fill) {
        self.dataset.border_color = border;
        self.dataset.background = background;
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn style(&self) -> &ChartStyle {
        &self.style
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn data(&self) -> &[f64] {
        &self.dataset.data
    }
}
