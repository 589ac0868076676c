//! 雅虎财经 chart 接口实现
//!
//! 对接 https://query1.finance.yahoo.com/v8/finance/chart/<symbol>
//! 浏览器场景下经由公共 CORS 中转服务转发，目标地址编码后作为 `url` 参数

use anyhow::{anyhow, Context, Result};
use reqwest::Client;
use std::time::Duration;

use crate::config::ApiConfig;
use crate::models::{ChartResponse, QuoteSnapshot};

/// 行情抓取器
///
/// 每次调用发起一次请求，不做重试；失败只记录日志
pub struct QuoteFetcher {
    /// HTTP 客户端
    client: Client,
    /// 上游 chart 接口地址
    upstream_base: String,
    /// CORS 中转地址
    cors_proxy: Option<String>,
    /// 采样间隔，如 `5m`
    interval: String,
    /// 回看范围，如 `1d`
    range: String,
}

impl QuoteFetcher {
    /// 按配置创建抓取器
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()
            .context("创建 HTTP 客户端失败")?;

        Ok(Self {
            client,
            upstream_base: config.upstream_base.trim_end_matches('/').to_string(),
            cors_proxy: config.cors_proxy.clone().filter(|p| !p.is_empty()),
            interval: config.interval.clone(),
            range: config.range.clone(),
        })
    }

    /// 上游接口地址
    pub fn upstream_url(&self, symbol: &str) -> String {
        format!(
            "{}/{}?interval={}&range={}",
            self.upstream_base, symbol, self.interval, self.range
        )
    }

    /// 实际请求地址：配置了中转服务时，将上游地址编码后作为 `url` 参数
    pub fn request_url(&self, symbol: &str) -> String {
        let target = self.upstream_url(symbol);
        match &self.cors_proxy {
            Some(proxy) => {
                let encoded: String = url::form_urlencoded::byte_serialize(target.as_bytes()).collect();
                format!("{}?url={}", proxy, encoded)
            }
            None => target,
        }
    }

    /// 获取单个指数的行情快照
    ///
    /// 网络错误、非成功状态码、响应结构异常均返回 `None`，由调用方跳过本次更新
    pub async fn fetch(&self, symbol: &str) -> Option<QuoteSnapshot> {
        match self.try_fetch(symbol).await {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                log::error!("获取 {} 行情失败: {:#}", symbol, e);
                None
            }
        }
    }

    async fn try_fetch(&self, symbol: &str) -> Result<QuoteSnapshot> {
        let url = self.request_url(symbol);
        log::debug!("请求行情数据 URL: {}", url);

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(anyhow!("行情接口返回异常状态: {}", response.status()));
        }

        let text = response.text().await?;
        parse_chart_payload(&text)
    }
}

/// 解析 chart 接口响应
///
/// 时间戳与收盘价按下标对齐，剔除收盘价为空（休市、停牌、盘前）的样本并保持顺序
pub fn parse_chart_payload(data: &str) -> Result<QuoteSnapshot> {
    let payload: ChartResponse = serde_json::from_str(data).context("响应不是合法的 JSON")?;
    let chart = payload.chart.ok_or_else(|| anyhow!("响应缺少 chart 字段"))?;

    if let Some(err) = chart.error {
        return Err(anyhow!(
            "上游返回错误: {} {}",
            err.code.unwrap_or_default(),
            err.description.unwrap_or_default()
        ));
    }

    let result = chart
        .result
        .and_then(|r| r.into_iter().next())
        .ok_or_else(|| anyhow!("响应缺少 chart.result[0]"))?;

    let meta = result.meta.ok_or_else(|| anyhow!("响应缺少 meta 字段"))?;
    let current_price = meta
        .regular_market_price
        .ok_or_else(|| anyhow!("响应缺少 meta.regularMarketPrice"))?;
    let previous_close = meta
        .chart_previous_close
        .ok_or_else(|| anyhow!("响应缺少 meta.chartPreviousClose"))?;

    let quote = result
        .indicators
        .and_then(|i| i.quote)
        .and_then(|q| q.into_iter().next())
        .ok_or_else(|| anyhow!("响应缺少 indicators.quote[0]"))?;

    let timestamps = result.timestamp.unwrap_or_default();
    let closes = quote.close.unwrap_or_default();

    let samples: Vec<(i64, f64)> = timestamps
        .iter()
        .enumerate()
        .filter_map(|(i, &ts)| closes.get(i).copied().flatten().map(|price| (ts, price)))
        .collect();

    Ok(QuoteSnapshot {
        prices: samples.iter().map(|&(_, price)| price).collect(),
        current_price,
        previous_close,
        last_updated: samples.last().map(|&(ts, _)| ts),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn payload(timestamps: &str, closes: &str, price: f64, prev: f64) -> String {
        format!(
            r#"{{"chart":{{"result":[{{"meta":{{"symbol":"^KS11","regularMarketPrice":{},"chartPreviousClose":{}}},
            "timestamp":{},"indicators":{{"quote":[{{"close":{}}}]}}}}],"error":null}}}}"#,
            price, prev, timestamps, closes
        )
    }

    fn proxied_config(server: &MockServer) -> ApiConfig {
        ApiConfig {
            cors_proxy: Some(format!("{}/raw", server.uri())),
            ..ApiConfig::default()
        }
    }

    /// 测试剔除空值并保持顺序
    #[test]
    fn test_parse_filters_null_closes() {
        let data = payload("[1,2,3]", "[100.0,null,102.0]", 102.0, 100.0);
        let snapshot = parse_chart_payload(&data).unwrap();

        assert_eq!(snapshot.prices, vec![100.0, 102.0]);
        assert_eq!(snapshot.current_price, 102.0);
        assert_eq!(snapshot.previous_close, 100.0);
        assert_eq!(snapshot.last_updated, Some(3));
    }

    /// 测试收盘价序列短于时间戳序列
    #[test]
    fn test_parse_short_close_series() {
        let data = payload("[10,20,30,40]", "[1.5,null,2.5]", 2.5, 2.0);
        let snapshot = parse_chart_payload(&data).unwrap();

        assert_eq!(snapshot.prices, vec![1.5, 2.5]);
        assert_eq!(snapshot.last_updated, Some(30));
    }

    /// 测试无有效样本时仍返回快照
    #[test]
    fn test_parse_all_null_still_returns_snapshot() {
        let data = payload("[1,2]", "[null,null]", 2500.0, 2490.0);
        let snapshot = parse_chart_payload(&data).unwrap();

        assert!(snapshot.prices.is_empty());
        assert_eq!(snapshot.last_updated, None);
        assert_eq!(snapshot.current_price, 2500.0);
    }

    /// 测试缺失时间戳视为空序列
    #[test]
    fn test_parse_missing_timestamp() {
        let data = r#"{"chart":{"result":[{"meta":{"regularMarketPrice":1.0,"chartPreviousClose":1.0},
            "indicators":{"quote":[{}]}}]}}"#;
        let snapshot = parse_chart_payload(data).unwrap();
        assert!(snapshot.prices.is_empty());
    }

    /// 测试结构异常的响应
    #[test]
    fn test_parse_malformed_payloads() {
        let cases = vec![
            "not json",
            r#"{}"#,
            r#"{"chart":{"result":[]}}"#,
            r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#,
            r#"{"chart":{"result":[{"meta":{"chartPreviousClose":1.0},"timestamp":[1],"indicators":{"quote":[{"close":[1.0]}]}}]}}"#,
            r#"{"chart":{"result":[{"meta":{"regularMarketPrice":1.0,"chartPreviousClose":1.0},"timestamp":[1],"indicators":{"quote":[]}}]}}"#,
        ];
        for data in cases {
            assert!(parse_chart_payload(data).is_err(), "应当解析失败: {}", data);
        }
    }

    #[test]
    fn test_request_url_through_proxy() {
        let fetcher = QuoteFetcher::new(&ApiConfig::default()).unwrap();
        assert_eq!(
            fetcher.upstream_url("^KS11"),
            "https://query1.finance.yahoo.com/v8/finance/chart/^KS11?interval=5m&range=1d"
        );
        assert_eq!(
            fetcher.request_url("^KS11"),
            "https://api.allorigins.win/raw?url=https%3A%2F%2Fquery1.finance.yahoo.com%2Fv8%2Ffinance%2Fchart%2F%5EKS11%3Finterval%3D5m%26range%3D1d"
        );
    }

    #[test]
    fn test_request_url_direct() {
        let config = ApiConfig {
            cors_proxy: None,
            upstream_base: "http://localhost:9000/chart/".to_string(),
            ..ApiConfig::default()
        };
        let fetcher = QuoteFetcher::new(&config).unwrap();
        assert_eq!(
            fetcher.request_url("^GSPC"),
            "http://localhost:9000/chart/^GSPC?interval=5m&range=1d"
        );
    }

    #[tokio::test]
    async fn test_fetch_via_proxy() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/raw"))
            .and(query_param(
                "url",
                "https://query1.finance.yahoo.com/v8/finance/chart/^IXIC?interval=5m&range=1d",
            ))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(payload("[1,2,3]", "[100.0,null,102.0]", 102.0, 100.0)),
            )
            .mount(&server)
            .await;

        let fetcher = QuoteFetcher::new(&proxied_config(&server)).unwrap();
        let snapshot = fetcher.fetch("^IXIC").await.expect("应当返回快照");
        assert_eq!(snapshot.prices, vec![100.0, 102.0]);
    }

    #[tokio::test]
    async fn test_fetch_non_success_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/raw"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let fetcher = QuoteFetcher::new(&proxied_config(&server)).unwrap();
        assert!(fetcher.fetch("^KS11").await.is_none());
    }

    #[tokio::test]
    async fn test_fetch_transport_error() {
        let config = ApiConfig {
            cors_proxy: Some("http://127.0.0.1:1/raw".to_string()),
            connect_timeout_secs: 1,
            timeout_secs: 2,
            ..ApiConfig::default()
        };
        let fetcher = QuoteFetcher::new(&config).unwrap();
        assert!(fetcher.fetch("^KS11").await.is_none());
    }
}
