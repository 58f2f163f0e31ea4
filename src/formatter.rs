//! Response formatting
//!
//! Converts one typed market payload into Korean report text. Every
//! function here is pure (payload + symbol → text) and total: any missing,
//! sentinel, or malformed field renders as "N/A" through the canonical
//! safe-parse, and no input shape may panic. The session owns everything
//! else (footers, polish, transcript).

use crate::error::GatewayError;
use crate::models::{
    MarketPayload, OverviewData, QuoteData, SentimentData, TechnicalData,
};
use crate::numeric::{display_number, display_or_na, safe_parse, truncate_chars, NA};

// Trend banding by signed change magnitude
const STRONG_MOVE_CHANGE: f64 = 5.0;
const STRONG_MOVE_PERCENT: f64 = 3.0;

// Volume bands, absolute share counts
const VOLUME_SURGE: f64 = 20_000_000.0;
const VOLUME_HIGH: f64 = 10_000_000.0;
const VOLUME_NORMAL: f64 = 1_000_000.0;

// Market-cap tier thresholds (USD)
const CAP_MEGA: f64 = 1_000_000_000_000.0;
const CAP_LARGE: f64 = 200_000_000_000.0;
const CAP_MID: f64 = 10_000_000_000.0;
const CAP_SMALL: f64 = 2_000_000_000.0;

/// Character budget for the company description block.
const DESCRIPTION_BUDGET: usize = 400;

/// Render one payload. The single dispatch point the session calls.
pub fn format(payload: &MarketPayload, symbol: &str) -> String {
    match payload {
        MarketPayload::Quote(quote) => format_quote(quote, symbol),
        MarketPayload::Overview(overview) => format_overview(overview, symbol),
        MarketPayload::Technical(technical) => format_technical(technical, symbol),
        MarketPayload::Sentiment(sentiment) => format_sentiment(sentiment, symbol),
        MarketPayload::Unavailable(error) => format_unavailable(error, symbol),
    }
}

//
// ================= Trend / tier banding =================
//

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    StrongUp,
    Up,
    StrongDown,
    Down,
    Flat,
}

impl Trend {
    pub fn label(self) -> &'static str {
        match self {
            Trend::StrongUp => "🚀 급등",
            Trend::Up => "📈 상승",
            Trend::StrongDown => "📉 급락",
            Trend::Down => "🔻 하락",
            Trend::Flat => "📊 보합",
        }
    }

    fn insight(self) -> &'static str {
        match self {
            Trend::StrongUp => "강한 상승 모멘텀! 매수 관심 증대",
            Trend::Up => "긍정적 흐름, 상승 추세 지속",
            Trend::StrongDown => "강한 하락 압력, 손절매 고려",
            Trend::Down => "약세 흐름, 신중한 접근 필요",
            Trend::Flat => "횡보 패턴, 방향성 대기",
        }
    }

    fn recommendation(self) -> &'static str {
        match self {
            Trend::StrongUp => "🟢 적극 매수",
            Trend::Up => "🟢 매수 검토",
            Trend::StrongDown => "🔴 매도 검토",
            Trend::Down => "🟡 관망",
            Trend::Flat => "🟡 관망",
        }
    }
}

/// Band the move; absent values count as zero, so a fully-absent quote
/// lands on Flat rather than failing.
pub fn classify_trend(change: Option<f64>, change_percent: Option<f64>) -> Trend {
    let change = change.unwrap_or(0.0);
    let percent = change_percent.unwrap_or(0.0);

    if change > STRONG_MOVE_CHANGE || percent > STRONG_MOVE_PERCENT {
        Trend::StrongUp
    } else if change > 0.0 {
        Trend::Up
    } else if change < -STRONG_MOVE_CHANGE || percent < -STRONG_MOVE_PERCENT {
        Trend::StrongDown
    } else if change < 0.0 {
        Trend::Down
    } else {
        Trend::Flat
    }
}

fn volume_insight(volume: Option<f64>) -> &'static str {
    match volume {
        Some(v) if v > VOLUME_SURGE => "🔥 초고거래량 (시장 주목)",
        Some(v) if v > VOLUME_HIGH => "🔥 고거래량 (활발한 거래)",
        Some(v) if v > VOLUME_NORMAL => "📊 보통거래량",
        Some(_) => "🔇 저거래량 (관심 부족)",
        None => "📊 거래량 정보 없음",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapTier {
    Mega,
    Large,
    Mid,
    Small,
    Micro,
}

impl CapTier {
    pub fn label(self) -> &'static str {
        match self {
            CapTier::Mega => "🟢 초대형주 (Mega Cap)",
            CapTier::Large => "🟢 대형주 (Large Cap)",
            CapTier::Mid => "🟡 중형주 (Mid Cap)",
            CapTier::Small => "🟠 소형주 (Small Cap)",
            CapTier::Micro => "🔴 초소형주 (Micro Cap)",
        }
    }

    fn risk(self) -> &'static str {
        match self {
            CapTier::Mega => "낮은 변동성",
            CapTier::Large => "안정적",
            CapTier::Mid => "중간 변동성",
            CapTier::Small => "높은 변동성",
            CapTier::Micro => "매우 높은 변동성",
        }
    }
}

pub fn classify_market_cap(cap: f64) -> CapTier {
    if cap >= CAP_MEGA {
        CapTier::Mega
    } else if cap >= CAP_LARGE {
        CapTier::Large
    } else if cap >= CAP_MID {
        CapTier::Mid
    } else if cap >= CAP_SMALL {
        CapTier::Small
    } else {
        CapTier::Micro
    }
}

/// Unit suffix follows the tier: T for mega, B for large/mid, M below.
pub fn format_market_cap(cap: f64) -> String {
    match classify_market_cap(cap) {
        CapTier::Mega => format!("${:.1}T", cap / 1_000_000_000_000.0),
        CapTier::Large | CapTier::Mid => format!("${:.1}B", cap / 1_000_000_000.0),
        CapTier::Small | CapTier::Micro => format!("${:.1}M", cap / 1_000_000.0),
    }
}

struct PeBand {
    analysis: &'static str,
    grade: &'static str,
    insight: &'static str,
}

fn classify_pe(pe: f64) -> PeBand {
    if pe < 10.0 {
        PeBand {
            analysis: " (💎 매우 저평가)",
            grade: "💚 강력 매수",
            insight: "역사적 저점, 가치 투자 기회",
        }
    } else if pe < 15.0 {
        PeBand {
            analysis: " (💰 저평가 가능)",
            grade: "💙 매수 검토",
            insight: "합리적 가격, 매수 고려",
        }
    } else if pe < 25.0 {
        PeBand {
            analysis: " (📊 적정 수준)",
            grade: "💛 관망",
            insight: "공정 가치, 신중한 접근",
        }
    } else if pe < 40.0 {
        PeBand {
            analysis: " (⚠️ 고평가 주의)",
            grade: "🧡 주의 필요",
            insight: "고평가 우려, 리스크 증가",
        }
    } else {
        PeBand {
            analysis: " (🚨 심각한 고평가)",
            grade: "🔴 매도 검토",
            insight: "버블 위험, 매도 고려",
        }
    }
}

/// Normalize a raw dividend-yield to percent: values below 1 are
/// fractions (×100), values at or above 1 are already percentages.
/// `0.05` and `5` therefore render identically.
pub fn normalize_dividend_percent(raw: f64) -> f64 {
    if raw < 1.0 {
        raw * 100.0
    } else {
        raw
    }
}

fn dividend_bands(percent: f64) -> (&'static str, &'static str) {
    if percent > 6.0 {
        (" (🎯 초고배당주)", "배당 투자자 최적")
    } else if percent > 4.0 {
        (" (💰 고배당주)", "안정적 수익")
    } else if percent > 2.0 {
        (" (📊 보통 배당)", "배당 수익 기대")
    } else if percent > 0.0 {
        (" (🔹 저배당)", "성장주 성향")
    } else {
        (" (❌ 무배당)", "성장 재투자")
    }
}

//
// ================= Per-kind formatters =================
//

pub fn format_quote(quote: &QuoteData, symbol: &str) -> String {
    let symbol_name = quote
        .symbol
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(symbol);

    let price = display_number(quote.price.as_deref());
    let open = display_number(quote.open.as_deref());
    let high = display_number(quote.high.as_deref());
    let low = display_number(quote.low.as_deref());
    let prev_close = display_number(quote.previous_close.as_deref());
    let volume = display_number(quote.volume.as_deref());
    let trading_day = display_or_na(quote.trading_day.as_deref());
    let change_display = display_or_na(quote.change.as_deref());
    let change_percent_display = display_or_na(quote.change_percent.as_deref());

    let change = safe_parse(quote.change.as_deref());
    let change_percent = safe_parse(quote.change_percent.as_deref());
    let volume_num = safe_parse(quote.volume.as_deref());

    let trend = classify_trend(change, change_percent);
    let volume_line = volume_insight(volume_num);

    let abs_change = change.unwrap_or(0.0).abs();
    let risk_level = if abs_change > 5.0 {
        "높음"
    } else if abs_change > 2.0 {
        "중간"
    } else {
        "낮음"
    };

    let momentum_line = match change.unwrap_or(0.0) {
        c if c > 3.0 => "• 상승 모멘텀 강화, 추가 매수 기회",
        c if c < -3.0 => "• 하락 추세 주의, 손절매 고려",
        _ => "• 횡보 구간, 방향성 확인 필요",
    };
    let volume_guide = if volume_num.unwrap_or(0.0) > VOLUME_HIGH {
        "• 고거래량으로 시장 관심 집중, 변동성 확대 가능"
    } else {
        "• 거래량 부족, 급격한 변동 가능성 낮음"
    };

    format!(
        "📊 **{symbol_name} 실시간 주식 분석**\n\n\
         💰 **핵심 가격 정보:**\n\
         • 현재가: ${price}\n\
         • 시가: ${open}\n\
         • 고가: ${high}\n\
         • 저가: ${low}\n\
         • 이전 종가: ${prev_close}\n\n\
         📈 **변동 분석:**\n\
         • 변동금액: {change_display}\n\
         • 변동률: {change_percent_display} {trend}\n\
         • 추천 등급: {recommendation}\n\n\
         📊 **거래 현황:**\n\
         • 거래량: {volume} 주 {volume_line}\n\
         • 거래일: {trading_day}\n\n\
         🧠 **투자 인사이트:**\n\
         • 시장 분석: {insight}\n\
         • 리스크 레벨: {risk_level}\n\n\
         📌 **투자 가이드라인:**\n\
         {momentum_line}\n\
         {volume_guide}\n",
        trend = trend.label(),
        recommendation = trend.recommendation(),
        insight = trend.insight(),
    )
}

pub fn format_overview(overview: &OverviewData, symbol: &str) -> String {
    let company_name = overview
        .name
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(symbol);

    let sector = display_or_na(overview.sector.as_deref());
    let industry = display_or_na(overview.industry.as_deref());
    let country = display_or_na(overview.country.as_deref());
    let currency = display_or_na(overview.currency.as_deref());
    let peg_ratio = display_number(overview.peg_ratio.as_deref());
    let week52_high = display_number(overview.week52_high.as_deref());
    let week52_low = display_number(overview.week52_low.as_deref());
    let day50_avg = display_number(overview.day50_avg.as_deref());
    let day200_avg = display_number(overview.day200_avg.as_deref());

    let (cap_display, cap_grade, cap_risk) = match safe_parse(overview.market_cap.as_deref()) {
        Some(cap) => {
            let tier = classify_market_cap(cap);
            (format_market_cap(cap), tier.label(), tier.risk())
        }
        None => (NA.to_string(), "정보 없음", "분석 불가"),
    };

    let (pe_display, pe_analysis, investment_grade, pe_insight) =
        match safe_parse(overview.pe_ratio.as_deref()) {
            Some(pe) => {
                let band = classify_pe(pe);
                (
                    crate::numeric::format_number(pe),
                    band.analysis,
                    band.grade,
                    band.insight,
                )
            }
            None => (NA.to_string(), "", "분석 필요", "데이터 부족"),
        };

    let (dividend_display, dividend_analysis, dividend_grade) =
        match safe_parse(overview.dividend_yield.as_deref()) {
            Some(raw) => {
                let percent = normalize_dividend_percent(raw);
                let (analysis, grade) = dividend_bands(percent);
                (format!("{:.2}%", percent), analysis, grade)
            }
            None => ("없음".to_string(), "", "무배당 정책"),
        };

    let description = match overview.description.as_deref() {
        Some(text) if !text.trim().is_empty() => truncate_chars(text, DESCRIPTION_BUDGET),
        _ => NA.to_string(),
    };

    format!(
        "🏢 **{company_name} 기업 분석 리포트**\n\n\
         🏭 **기업 기본 정보:**\n\
         • 회사명: {company_name}\n\
         • 상장 심볼: {symbol}\n\
         • 업종: {sector}\n\
         • 세부 산업: {industry}\n\
         • 본사 국가: {country}\n\
         • 기준 통화: {currency}\n\n\
         💹 **투자 핵심 지표:**\n\
         • 시가총액: {cap_display} {cap_grade}\n\
         • 리스크 수준: {cap_risk}\n\
         • P/E 비율: {pe_display}{pe_analysis}\n\
         • PEG 비율: {peg_ratio}\n\
         • 배당수익률: {dividend_display}{dividend_analysis}\n\n\
         📊 **주가 기술적 분석:**\n\
         • 52주 최고가: ${week52_high}\n\
         • 52주 최저가: ${week52_low}\n\
         • 50일 이동평균: ${day50_avg}\n\
         • 200일 이동평균: ${day200_avg}\n\n\
         🧠 **종합 투자 등급:** {investment_grade}\n\n\
         💡 **투자 인사이트:**\n\
         • P/E 분석: {pe_insight}\n\
         • 배당 전략: {dividend_grade}\n\
         • 리스크 평가: {cap_risk}\n\n\
         💼 **회사 사업 개요:**\n\
         {description}\n",
    )
}

/// Fixed educational template. The fetched series is intentionally not
/// rendered; see DESIGN.md for the decision record.
pub fn format_technical(technical: &TechnicalData, symbol: &str) -> String {
    let indicator = if technical.indicator.is_empty() {
        "RSI"
    } else {
        technical.indicator.as_str()
    };

    format!(
        "📈 **{symbol} 기술적 분석 ({indicator})**\n\n\
         🎯 **RSI 지표 분석:**\n\
         • RSI 14일 기준 데이터 준비 완료\n\
         • 과매수 신호: 70 이상 (매도 타이밍)\n\
         • 과매도 신호: 30 이하 (매수 타이밍)\n\
         • 중립 구간: 30-70 (추세 지속)\n\n\
         🧠 **전문가 분석 가이드:**\n\
         • RSI는 모멘텀 오실레이터의 대표 지표\n\
         • 0-100 범위에서 과매수/과매도 판단\n\
         • 다이버전스 신호로 추세 반전 예측\n\
         • 다른 기술적 지표와 조합 시 신뢰도 증가\n\n\
         🔔 **위험 관리 포인트:**\n\
         • 강한 추세장에서는 과매수/과매도 지속 가능\n\
         • 볼린저 밴드, MACD와 함께 확인\n\
         • 거래량과 함께 신호 검증\n",
    )
}

pub fn format_sentiment(sentiment: &SentimentData, symbol: &str) -> String {
    let count_line = if sentiment.articles.is_empty() {
        "• 분석 가능한 기사 없음".to_string()
    } else {
        format!("• 분석 기사 수: {}개", sentiment.articles.len())
    };

    format!(
        "📰 **{symbol} 시장 감정 분석**\n\n\
         🎯 **뉴스 데이터:**\n\
         {count_line}\n\
         • 최근 24시간 뉴스 기준\n\n\
         📊 **감정 점수 해석 가이드:**\n\
         • 긍정 > 70%: 강한 상승 모멘텀 기대\n\
         • 긍정 50-70%: 온건한 낙관론\n\
         • 중립 40-60%: 균형 잡힌 시각\n\
         • 부정 30-50%: 신중한 우려\n\
         • 부정 > 70%: 강한 하락 우려\n\n\
         🔔 **투자 활용 전략:**\n\
         • 감정 분석은 단기 변동성 예측에 특히 유용\n\
         • 펀더멘털 분석과 반드시 병행\n\
         • 극단적 감정일 때 역발상 투자 고려\n",
    )
}

/// Apology template. Never an error: this is a normal report.
pub fn format_unavailable(error: &GatewayError, symbol: &str) -> String {
    let situation = match error {
        GatewayError::RateLimited { retry_after } => match retry_after {
            Some(seconds) => format!(
                "• API 호출 제한에 도달했습니다 ({}초 후 재시도 가능)",
                seconds
            ),
            None => "• API 호출 제한에 도달했습니다".to_string(),
        },
        GatewayError::NotFound => "• 요청하신 심볼을 찾을 수 없습니다".to_string(),
        GatewayError::Transport { message } => {
            format!("• 일시적인 네트워크 문제가 발생했습니다: {}", message)
        }
    };

    format!(
        "⚠️ **{symbol} 데이터 조회 제한**\n\n\
         🔍 **상황 분석:**\n\
         {situation}\n\n\
         💡 **대안 제안:**\n\
         • 잠시 후 다시 시도해주세요\n\
         • 다른 주식 심볼로 테스트\n\
         • 메이저 종목 우선 확인 (AAPL, MSFT, GOOGL)\n",
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quote_fixture() -> QuoteData {
        QuoteData {
            symbol: Some("AAPL".to_string()),
            open: Some("148.50".to_string()),
            high: Some("151".to_string()),
            low: Some("149".to_string()),
            price: Some("150.25".to_string()),
            volume: Some("50000000".to_string()),
            trading_day: Some("2024-06-01".to_string()),
            previous_close: Some("147.75".to_string()),
            change: Some("2.50".to_string()),
            change_percent: Some("1.69%".to_string()),
        }
    }

    #[test]
    fn test_trend_bands() {
        assert_eq!(classify_trend(Some(0.0), Some(0.0)), Trend::Flat);
        assert_eq!(classify_trend(Some(2.5), Some(1.69)), Trend::Up);
        assert_eq!(classify_trend(Some(5.1), Some(0.1)), Trend::StrongUp);
        assert_eq!(classify_trend(Some(0.1), Some(3.1)), Trend::StrongUp);
        assert_eq!(classify_trend(Some(-0.5), Some(-0.3)), Trend::Down);
        assert_eq!(classify_trend(Some(-5.1), Some(-0.1)), Trend::StrongDown);
        assert_eq!(classify_trend(Some(-0.1), Some(-3.1)), Trend::StrongDown);
    }

    #[test]
    fn test_trend_boundaries_are_strict() {
        // Exactly 5 / 3% is not a strong move
        assert_eq!(classify_trend(Some(5.0), Some(0.0)), Trend::Up);
        assert_eq!(classify_trend(Some(0.0), Some(3.0)), Trend::Flat);
        assert_eq!(classify_trend(Some(-5.0), Some(0.0)), Trend::Down);
        assert_eq!(classify_trend(Some(0.0), Some(-3.0)), Trend::Flat);
    }

    #[test]
    fn test_trend_absent_values_are_flat() {
        assert_eq!(classify_trend(None, None), Trend::Flat);
    }

    #[test]
    fn test_market_cap_tier_boundaries() {
        assert_eq!(classify_market_cap(999_999_999_999.0), CapTier::Large);
        assert_eq!(classify_market_cap(1_000_000_000_000.0), CapTier::Mega);
        assert_eq!(classify_market_cap(199_999_999_999.0), CapTier::Mid);
        assert_eq!(classify_market_cap(200_000_000_000.0), CapTier::Large);
        assert_eq!(classify_market_cap(9_999_999_999.0), CapTier::Small);
        assert_eq!(classify_market_cap(10_000_000_000.0), CapTier::Mid);
        assert_eq!(classify_market_cap(1_999_999_999.0), CapTier::Micro);
        assert_eq!(classify_market_cap(2_000_000_000.0), CapTier::Small);
    }

    #[test]
    fn test_market_cap_unit_suffixes() {
        assert_eq!(format_market_cap(1_500_000_000_000.0), "$1.5T");
        assert_eq!(format_market_cap(850_000_000_000.0), "$850.0B");
        assert_eq!(format_market_cap(15_000_000_000.0), "$15.0B");
        assert_eq!(format_market_cap(3_000_000_000.0), "$3000.0M");
    }

    #[test]
    fn test_dividend_normalization_idempotence() {
        // A fraction and an already-percent value render identically
        assert_eq!(format!("{:.2}%", normalize_dividend_percent(0.05)), "5.00%");
        assert_eq!(format!("{:.2}%", normalize_dividend_percent(5.0)), "5.00%");
        assert_eq!(format!("{:.2}%", normalize_dividend_percent(0.0)), "0.00%");
    }

    #[test]
    fn test_quote_report_contents() {
        let report = format_quote(&quote_fixture(), "AAPL");
        assert!(report.contains("AAPL"));
        assert!(report.contains("$150.25"));
        assert!(report.contains("상승"));
        assert!(report.contains("50,000,000"));
        assert!(report.contains("초고거래량"));
        assert!(report.contains("2024-06-01"));
        assert!(!report.contains("panic"));
    }

    #[test]
    fn test_quote_with_all_sentinel_fields_renders_na() {
        let quote = QuoteData {
            symbol: None,
            open: Some("".to_string()),
            high: Some("None".to_string()),
            low: Some("N/A".to_string()),
            price: None,
            volume: Some("-".to_string()),
            trading_day: None,
            previous_close: Some("None".to_string()),
            change: None,
            change_percent: Some("".to_string()),
        };
        let report = format_quote(&quote, "AAPL");
        assert!(report.contains("$N/A"));
        assert!(report.contains("보합"));
        assert!(report.contains("거래량 정보 없음"));
    }

    #[test]
    fn test_overview_report_contents() {
        let overview = OverviewData {
            symbol: Some("TSLA".to_string()),
            name: Some("Tesla Inc".to_string()),
            market_cap: Some("850000000000".to_string()),
            pe_ratio: None,
            dividend_yield: Some("0.000".to_string()),
            ..Default::default()
        };
        let report = format_overview(&overview, "TSLA");
        assert!(report.contains("$850.0B"));
        assert!(report.contains("대형주"));
        assert!(report.contains("P/E 비율: N/A"));
        assert!(report.contains("0.00%"));
        assert!(report.contains("무배당"));
    }

    #[test]
    fn test_overview_with_sentinel_fields_never_raises() {
        let overview = OverviewData {
            market_cap: Some("None".to_string()),
            pe_ratio: Some("".to_string()),
            dividend_yield: Some("N/A".to_string()),
            week52_high: Some("-".to_string()),
            ..Default::default()
        };
        let report = format_overview(&overview, "ZZZQ");
        assert!(report.contains("N/A"));
        assert!(report.contains("없음"));
    }

    #[test]
    fn test_overview_description_is_truncated() {
        let overview = OverviewData {
            description: Some("가나다라".repeat(200)),
            ..Default::default()
        };
        let report = format_overview(&overview, "AAPL");
        assert!(report.contains("..."));
        let description_line = report
            .lines()
            .last()
            .expect("report has lines");
        assert!(description_line.chars().count() <= DESCRIPTION_BUDGET + 3);
    }

    #[test]
    fn test_pe_bands() {
        assert_eq!(classify_pe(9.9).grade, "💚 강력 매수");
        assert_eq!(classify_pe(10.0).grade, "💙 매수 검토");
        assert_eq!(classify_pe(15.0).grade, "💛 관망");
        assert_eq!(classify_pe(25.0).grade, "🧡 주의 필요");
        assert_eq!(classify_pe(40.0).grade, "🔴 매도 검토");
    }

    #[test]
    fn test_technical_template_names_thresholds() {
        let report = format_technical(&TechnicalData::default(), "NVDA");
        assert!(report.contains("NVDA"));
        assert!(report.contains("70"));
        assert!(report.contains("30"));
    }

    #[test]
    fn test_sentiment_article_count() {
        let sentiment = SentimentData {
            articles: vec![Default::default(); 7],
        };
        let report = format_sentiment(&sentiment, "META");
        assert!(report.contains("META"));
        assert!(report.contains("7개"));

        let empty = format_sentiment(&SentimentData::default(), "META");
        assert!(empty.contains("기사 없음"));
    }

    #[test]
    fn test_unavailable_templates_name_the_symbol() {
        for error in [
            GatewayError::RateLimited { retry_after: None },
            GatewayError::RateLimited {
                retry_after: Some(30),
            },
            GatewayError::NotFound,
            GatewayError::transport("connection reset"),
        ] {
            let report = format_unavailable(&error, "TSLA");
            assert!(report.contains("TSLA"));
            assert!(report.contains("다시 시도"));
        }
    }

    #[test]
    fn test_format_dispatch_is_total() {
        let payloads = [
            MarketPayload::Quote(QuoteData::default()),
            MarketPayload::Overview(OverviewData::default()),
            MarketPayload::Technical(TechnicalData::default()),
            MarketPayload::Sentiment(SentimentData::default()),
            MarketPayload::Unavailable(GatewayError::NotFound),
        ];
        for payload in &payloads {
            let report = format(payload, "AAPL");
            assert!(!report.is_empty());
        }
    }
}
