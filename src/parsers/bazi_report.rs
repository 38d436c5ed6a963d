//! Parser for the plain-text report printed by the `bazi.py` chart engine.
//!
//! The report has no formal grammar. Extraction relies on a small set of
//! marker labels and character alphabets; a line that does not carry the
//! expected marker simply contributes nothing.

use regex::Regex;

use crate::models::chart::{BasicInfo, ElementScores, FiveElements, ParsedChart};
use crate::parsers::Parser;

/// Heavenly stems, in cyclical order.
pub const STEMS: &str = "甲乙丙丁戊己庚辛壬癸";

/// Earthly branches, in cyclical order.
pub const BRANCHES: &str = "子丑寅卯辰巳午未申酉戌亥";

const SOLAR_LABEL: &str = "公历:";
const LUNAR_LABEL: &str = "农历:";
const FIVE_ELEMENTS_LABEL: &str = "五行分数";
const STRENGTH_LABEL: &str = "八字强弱";
const PATTERN_SELECTION_LABEL: &str = "格局选用：";
const BUREAU_CHAR: char = '局';
const PATTERN_CHAR: char = '格';
const WEAK_SENTINELS: [&str; 2] = ["weak: True", "强根: 无"];

/// Stem row of the engine's own sample chart, accepted verbatim.
const EXAMPLE_STEM_LINE: &str = "丁 己 癸 壬";

/// Only the report header carries dates and palaces.
const HEADER_SCAN_LINES: usize = 50;

/// Analysis lines at or below this many characters are noise.
const MIN_ANALYSIS_CHARS: usize = 10;

const SPIRIT_KEYWORDS: [&str; 10] = [
    "天乙", "驿马", "桃花", "华盖", "将星", "文昌", "劫煞", "空亡", "天罗", "地网",
];

const ANALYSIS_KEYWORDS: [&str; 15] = [
    "建禄格", "阳刃格", "食神", "伤官", "财格", "官格", "杀格", "印格", "比劫", "偏印", "正印",
    "偏财", "正财", "七杀", "正官",
];

/// Parser for `bazi.py` reports. Build once and share; regexes are compiled up front.
#[derive(Debug, Clone)]
pub struct BaziReportParser {
    minggong: Regex,
    taiyuan: Regex,
    stem_row: Regex,
    element_scores: Regex,
    strength: Regex,
}

impl BaziReportParser {
    pub fn new() -> Result<Self, anyhow::Error> {
        let stem = format!("[{STEMS}]");
        Ok(Self {
            minggong: Regex::new(r"命宫:(\S+)")?,
            taiyuan: Regex::new(r"胎元:(\S+)")?,
            stem_row: Regex::new(&format!(r"{stem}\s+{stem}\s+{stem}\s+{stem}"))?,
            element_scores: Regex::new(
                r"\{'金':\s*([0-9]+),\s*'木':\s*([0-9]+),\s*'水':\s*([0-9]+),\s*'火':\s*([0-9]+),\s*'土':\s*([0-9]+)\}",
            )?,
            strength: Regex::new(r"强弱[：:]\s*([0-9]+)")?,
        })
    }

    /// Dates and palaces from the report header. First occurrence of each wins.
    fn extract_header(&self, lines: &[&str], basic: &mut BasicInfo) {
        for line in lines.iter().take(HEADER_SCAN_LINES) {
            if basic.solar.is_none() {
                basic.solar = token_after(line, SOLAR_LABEL);
            }
            if basic.lunar.is_none() {
                basic.lunar = token_after(line, LUNAR_LABEL);
            }
            if basic.minggong.is_none() {
                basic.minggong = first_capture(&self.minggong, line);
            }
            if basic.taiyuan.is_none() {
                basic.taiyuan = first_capture(&self.taiyuan, line);
            }
        }
    }

    /// The stem row and, on the line right below it, the branch row.
    fn extract_pillars(&self, lines: &[&str], basic: &mut BasicInfo) {
        let Some(row) = lines
            .iter()
            .position(|line| line.contains(EXAMPLE_STEM_LINE) || self.stem_row.is_match(line))
        else {
            return;
        };

        basic.gans = first_four(lines[row], STEMS);
        basic.zhis = lines
            .get(row + 1)
            .and_then(|next| first_four(next, BRANCHES));
    }

    /// Later score and strength lines override earlier ones.
    fn extract_five_elements(&self, lines: &[&str]) -> FiveElements {
        let mut elements = FiveElements {
            scores: lines
                .iter()
                .filter(|line| line.contains(FIVE_ELEMENTS_LABEL))
                .filter_map(|line| self.element_scores(line))
                .last(),
            ..FiveElements::default()
        };

        for line in lines.iter().filter(|line| line.contains(STRENGTH_LABEL)) {
            if let Some(strength) = self
                .strength
                .captures(line)
                .and_then(|caps| caps[1].parse().ok())
            {
                elements.strength = Some(strength);
            }
            // Emitted whenever a strength line exists, even without a sentinel.
            elements.is_weak = Some(WEAK_SENTINELS.iter().any(|s| line.contains(s)));
        }

        elements
    }

    /// All five scores or nothing.
    fn element_scores(&self, line: &str) -> Option<ElementScores> {
        let caps = self.element_scores.captures(line)?;
        let score = |i: usize| caps[i].parse::<i64>().ok();
        Some(ElementScores {
            metal: score(1)?,
            wood: score(2)?,
            water: score(3)?,
            fire: score(4)?,
            earth: score(5)?,
        })
    }
}

impl Parser for BaziReportParser {
    fn parse(&self, text: &str) -> ParsedChart {
        let lines: Vec<&str> = text.lines().collect();
        let mut chart = ParsedChart::from_raw(text);

        self.extract_header(&lines, &mut chart.basic);
        self.extract_pillars(&lines, &mut chart.basic);
        chart.five_elements = self.extract_five_elements(&lines);

        for line in &lines {
            let trimmed = line.trim();

            if is_pattern_line(line) {
                chart.patterns.push(trimmed.to_string());
            }
            if SPIRIT_KEYWORDS.iter().any(|k| line.contains(k)) {
                chart.spirits.push(trimmed.to_string());
            }
            if ANALYSIS_KEYWORDS.iter().any(|k| line.contains(k))
                && trimmed.chars().count() > MIN_ANALYSIS_CHARS
            {
                chart.analysis.push(trimmed.to_string());
            }
        }

        chart
    }

    fn source_tool(&self) -> &str {
        "bazi.py"
    }
}

fn is_pattern_line(line: &str) -> bool {
    line.contains(PATTERN_SELECTION_LABEL)
        || (line.contains(BUREAU_CHAR) && line.contains(PATTERN_CHAR))
}

/// First whitespace-delimited token following `label`.
fn token_after(line: &str, label: &str) -> Option<String> {
    let (_, rest) = line.split_once(label)?;
    rest.split_whitespace().next().map(str::to_string)
}

fn first_capture(re: &Regex, line: &str) -> Option<String> {
    re.captures(line).map(|caps| caps[1].to_string())
}

/// First four characters of `line` drawn from `alphabet`, or `None` if there are fewer.
fn first_four(line: &str, alphabet: &str) -> Option<[String; 4]> {
    let mut found = line
        .chars()
        .filter(|c| alphabet.contains(*c))
        .map(String::from);
    Some([found.next()?, found.next()?, found.next()?, found.next()?])
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = include_str!("../../tests/fixtures/bazi_report_sample.txt");

    fn parser() -> BaziReportParser {
        BaziReportParser::new().unwrap()
    }

    #[test]
    fn raw_output_is_preserved_verbatim() {
        let chart = parser().parse(SAMPLE);
        assert_eq!(chart.raw_output, SAMPLE);
    }

    #[test]
    fn unrecognized_text_yields_empty_chart() {
        let text = "hello world\nnothing to see here\n";
        let chart = parser().parse(text);
        assert_eq!(chart, ParsedChart::from_raw(text));
        assert!(chart.five_elements.is_empty());
    }

    #[test]
    fn empty_input_is_not_an_error() {
        let chart = parser().parse("");
        assert_eq!(chart.raw_output, "");
        assert!(chart.patterns.is_empty());
    }

    #[test]
    fn extracts_header_dates_and_palaces() {
        let chart = parser().parse(SAMPLE);
        assert_eq!(chart.basic.solar.as_deref(), Some("1977年9月22日"));
        assert_eq!(chart.basic.lunar.as_deref(), Some("1977年8月10日"));
        assert_eq!(chart.basic.minggong.as_deref(), Some("丙辰"));
        assert_eq!(chart.basic.taiyuan.as_deref(), Some("庚子"));
    }

    #[test]
    fn first_header_match_wins() {
        let text = "公历: 2000年1月1日\n公历: 1999年1月1日\n命宫:甲子\n命宫:乙丑";
        let chart = parser().parse(text);
        assert_eq!(chart.basic.solar.as_deref(), Some("2000年1月1日"));
        assert_eq!(chart.basic.minggong.as_deref(), Some("甲子"));
    }

    #[test]
    fn header_markers_beyond_scan_window_are_ignored() {
        let mut text = "filler\n".repeat(HEADER_SCAN_LINES);
        text.push_str("公历: 2000年1月1日\n");
        let chart = parser().parse(&text);
        assert!(chart.basic.solar.is_none());
    }

    #[test]
    fn label_without_token_is_omitted() {
        let chart = parser().parse("公历:   \n");
        assert!(chart.basic.solar.is_none());
    }

    #[test]
    fn extracts_stem_and_branch_rows() {
        let chart = parser().parse(SAMPLE);
        assert_eq!(
            chart.basic.gans,
            Some(["丁", "己", "癸", "壬"].map(String::from))
        );
        assert_eq!(
            chart.basic.zhis,
            Some(["巳", "酉", "未", "戌"].map(String::from))
        );
    }

    #[test]
    fn three_stems_populate_neither_row() {
        let chart = parser().parse("甲 乙 丙\n子 丑 寅 卯\n");
        assert!(chart.basic.gans.is_none());
        assert!(chart.basic.zhis.is_none());
    }

    #[test]
    fn short_branch_row_is_omitted() {
        let chart = parser().parse("甲 乙 丙 丁\n子 丑 寅\n");
        assert_eq!(
            chart.basic.gans,
            Some(["甲", "乙", "丙", "丁"].map(String::from))
        );
        assert!(chart.basic.zhis.is_none());
    }

    #[test]
    fn only_first_stem_row_is_used() {
        let chart = parser().parse("甲 乙 丙 丁\n子 丑 寅 卯\n戊 己 庚 辛\n辰 巳 午 未\n");
        assert_eq!(
            chart.basic.gans,
            Some(["甲", "乙", "丙", "丁"].map(String::from))
        );
        assert_eq!(
            chart.basic.zhis,
            Some(["子", "丑", "寅", "卯"].map(String::from))
        );
    }

    #[test]
    fn extracts_five_element_scores() {
        let chart = parser().parse(SAMPLE);
        assert_eq!(
            chart.five_elements.scores,
            Some(ElementScores {
                metal: 10,
                wood: 5,
                water: 3,
                fire: 8,
                earth: 2,
            })
        );
    }

    #[test]
    fn malformed_score_line_is_skipped() {
        let chart = parser().parse("五行分数 {'金': 10, '木': 5, '水': 3, '火': 8}");
        assert!(chart.five_elements.scores.is_none());
    }

    #[test]
    fn strength_and_weak_flag() {
        let chart = parser().parse(SAMPLE);
        assert_eq!(chart.five_elements.strength, Some(24));
        assert_eq!(chart.five_elements.is_weak, Some(true));
    }

    #[test]
    fn weak_flag_defaults_to_false_on_strength_line() {
        let chart = parser().parse("八字强弱:31 通常>29为强");
        assert_eq!(chart.five_elements.strength, Some(31));
        assert_eq!(chart.five_elements.is_weak, Some(false));
    }

    #[test]
    fn weak_flag_from_missing_root_sentinel() {
        let chart = parser().parse("八字强弱：12 强根: 无");
        assert_eq!(chart.five_elements.is_weak, Some(true));
    }

    #[test]
    fn later_score_and_strength_lines_win() {
        let text = "五行分数 {'金': 1, '木': 1, '水': 1, '火': 1, '土': 1}\n\
                    八字强弱：10 weak: True\n\
                    五行分数 {'金': 9, '木': 9, '水': 9, '火': 9, '土': 9}\n\
                    八字强弱：40\n";
        let chart = parser().parse(text);
        assert_eq!(
            chart.five_elements.scores,
            Some(ElementScores {
                metal: 9,
                wood: 9,
                water: 9,
                fire: 9,
                earth: 9,
            })
        );
        assert_eq!(chart.five_elements.strength, Some(40));
        assert_eq!(chart.five_elements.is_weak, Some(false));
    }

    #[test]
    fn mismatching_later_score_line_keeps_earlier_scores() {
        let text = "五行分数 {'金': 2, '木': 3, '水': 4, '火': 5, '土': 6}\n五行分数 unavailable\n";
        let chart = parser().parse(text);
        assert_eq!(chart.five_elements.scores.map(|s| s.metal), Some(2));
    }

    #[test]
    fn full_width_digits_are_not_scores() {
        let chart = parser().parse("五行分数 {'金': １0, '木': 5, '水': 3, '火': 8, '土': 2}");
        assert!(chart.five_elements.scores.is_none());
        let chart = parser().parse("八字强弱：３ weak: True");
        assert_eq!(chart.five_elements.strength, None);
        assert_eq!(chart.five_elements.is_weak, Some(true));
    }

    #[test]
    fn crlf_reports_trim_cleanly() {
        let text = SAMPLE.replace('\n', "\r\n");
        let chart = parser().parse(&text);
        assert_eq!(chart.raw_output, text);
        assert_eq!(chart.basic.minggong.as_deref(), Some("丙辰"));
        assert_eq!(chart.basic.taiyuan.as_deref(), Some("庚子"));
        assert_eq!(
            chart.basic.zhis,
            Some(["巳", "酉", "未", "戌"].map(String::from))
        );
        assert_eq!(chart.patterns, parser().parse(SAMPLE).patterns);
        assert!(chart.patterns.iter().all(|l| !l.ends_with('\r')));
        assert!(chart.spirits.iter().all(|l| !l.ends_with('\r')));
    }

    #[test]
    fn collects_pattern_lines_in_order() {
        let chart = parser().parse(SAMPLE);
        assert_eq!(
            chart.patterns,
            vec![
                "格局选用：正官格 七杀格".to_string(),
                "月柱：七杀 偏印 正官，杀印相生格局明显".to_string(),
            ]
        );
    }

    #[test]
    fn duplicate_lines_are_kept() {
        let chart = parser().parse("  格局选用：正官格  \n格局选用：正官格\n");
        assert_eq!(chart.patterns.len(), 2);
        assert_eq!(chart.patterns[0], "格局选用：正官格");
    }

    #[test]
    fn collects_spirit_lines_once_each() {
        let chart = parser().parse(SAMPLE);
        assert_eq!(
            chart.spirits,
            vec![
                "神煞：天乙贵人在卯 桃花在午 驿马在亥".to_string(),
                "空亡：申酉".to_string(),
            ]
        );
    }

    #[test]
    fn analysis_requires_keyword_and_length() {
        let chart = parser().parse(SAMPLE);
        assert_eq!(
            chart.analysis,
            vec![
                "格局选用：正官格 七杀格".to_string(),
                "月柱：七杀 偏印 正官，杀印相生格局明显".to_string(),
                "日主癸水 生于酉月 正印当令，身弱喜比劫帮身".to_string(),
            ]
        );
        assert!(!chart.analysis.iter().any(|l| l.starts_with("比劫：")));
    }

    #[test]
    fn analysis_length_counts_characters_not_bytes() {
        // Ten characters (thirty bytes) is not long enough.
        let chart = parser().parse("食神食神食神食神食神");
        assert!(chart.analysis.is_empty());
        let chart = parser().parse("食神食神食神食神食神食");
        assert_eq!(chart.analysis.len(), 1);
    }

    #[test]
    fn parsing_is_deterministic() {
        let p = parser();
        assert_eq!(p.parse(SAMPLE), p.parse(SAMPLE));
    }

    #[test]
    fn serializes_expected_shape() {
        let json = serde_json::to_value(parser().parse(SAMPLE)).unwrap();
        assert_eq!(json["basic"]["gans"][0], "丁");
        assert_eq!(json["fiveElements"]["metal"], 10);
        assert_eq!(json["fiveElements"]["isWeak"], true);
        assert_eq!(json["rawOutput"], SAMPLE);
    }
}
