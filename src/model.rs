//! Uniform in-memory representation of a coverage report, independent of
//! the serialized format. Parsers produce a `Coverage` tree (report →
//! packages → classes) which the summary renderer walks.

use std::cmp::Ordering;
use std::iter::Sum;
use std::ops::Add;
use std::str::FromStr;

/// Compute a coverage percentage, returning NaN when there was nothing to
/// cover. The result is not rounded.
#[must_use]
pub fn percentage(missed: u64, covered: u64) -> f64 {
    let total = missed as f64 + covered as f64;
    if total == 0.0 {
        f64::NAN
    } else {
        covered as f64 * 100.0 / total
    }
}

/// The kinds of coverage tracked at every level of the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Metric {
    Instruction,
    Branch,
    Line,
    Complexity,
    Method,
    Class,
}

impl Metric {
    pub const ALL: [Metric; 6] = [
        Metric::Instruction,
        Metric::Branch,
        Metric::Line,
        Metric::Complexity,
        Metric::Method,
        Metric::Class,
    ];

    /// Name used for this metric in report files, e.g. `INSTRUCTION`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Instruction => "INSTRUCTION",
            Metric::Branch => "BRANCH",
            Metric::Line => "LINE",
            Metric::Complexity => "COMPLEXITY",
            Metric::Method => "METHOD",
            Metric::Class => "CLASS",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl FromStr for Metric {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Metric::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or(())
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Missed/covered pair for one metric at one level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counter {
    pub missed: u64,
    pub covered: u64,
}

impl Counter {
    pub fn new(missed: u64, covered: u64) -> Self {
        Self { missed, covered }
    }

    #[must_use]
    pub fn percentage(&self) -> f64 {
        percentage(self.missed, self.covered)
    }
}

impl Add for Counter {
    type Output = Counter;

    fn add(self, rhs: Counter) -> Counter {
        Counter {
            missed: self.missed.saturating_add(rhs.missed),
            covered: self.covered.saturating_add(rhs.covered),
        }
    }
}

impl Sum for Counter {
    fn sum<I: Iterator<Item = Counter>>(iter: I) -> Counter {
        iter.fold(Counter::default(), Add::add)
    }
}

/// One optional counter per metric kind. An absent counter reads as NaN.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counters {
    slots: [Option<Counter>; 6],
}

impl Counters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, metric: Metric) -> Option<Counter> {
        self.slots[metric.index()]
    }

    pub fn set(&mut self, metric: Metric, counter: Option<Counter>) {
        self.slots[metric.index()] = counter;
    }

    /// Build counters by asking `lookup` for each metric kind.
    pub fn from_fn(mut lookup: impl FnMut(Metric) -> Option<Counter>) -> Self {
        let mut counters = Self::new();
        for metric in Metric::ALL {
            counters.set(metric, lookup(metric));
        }
        counters
    }
}

/// The six coverage percentages every level of the tree exposes.
///
/// Implementors only say which counter backs a metric; the percentage
/// computation is shared.
pub trait CoverageMetrics {
    fn counter(&self, metric: Metric) -> Option<Counter>;

    fn percentage(&self, metric: Metric) -> f64 {
        self.counter(metric).map_or(f64::NAN, |c| c.percentage())
    }

    fn instruction(&self) -> f64 {
        self.percentage(Metric::Instruction)
    }

    fn branch(&self) -> f64 {
        self.percentage(Metric::Branch)
    }

    fn line(&self) -> f64 {
        self.percentage(Metric::Line)
    }

    fn complexity(&self) -> f64 {
        self.percentage(Metric::Complexity)
    }

    fn method(&self) -> f64 {
        self.percentage(Metric::Method)
    }

    fn class(&self) -> f64 {
        self.percentage(Metric::Class)
    }

    /// Whether any instructions were instrumented at this level.
    fn has_coverage(&self) -> bool {
        !self.instruction().is_nan()
    }
}

/// Whitespace, punctuation and symbols in collation order. All of them sort
/// ahead of digits, and digits ahead of letters.
const SYMBOL_ORDER: &str = " \t_-,;:!?.'\"()[]{}@*/\\&#%`^+<=>|~$";

/// Primary collation weight of a single character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Weight {
    Symbol(u32),
    Digit(u32),
    Letter(char),
}

fn primary_weight(c: char) -> Weight {
    if let Some(pos) = SYMBOL_ORDER.find(c) {
        return Weight::Symbol(pos as u32);
    }
    if let Some(digit) = c.to_digit(10) {
        return Weight::Digit(digit);
    }
    if c.is_alphanumeric() {
        return Weight::Letter(base_letter(c));
    }
    Weight::Symbol(SYMBOL_ORDER.len() as u32 + c as u32)
}

/// Lower-case `c` and strip diacritics from Latin letters.
fn base_letter(c: char) -> char {
    let lower = c.to_lowercase().next().unwrap_or(c);
    match lower {
        'à'..='å' | 'ā' | 'ă' | 'ą' => 'a',
        'ç' | 'ć' | 'ĉ' | 'ċ' | 'č' => 'c',
        'ď' | 'đ' => 'd',
        'è'..='ë' | 'ē' | 'ĕ' | 'ė' | 'ę' | 'ě' => 'e',
        'ĝ' | 'ğ' | 'ġ' | 'ģ' => 'g',
        'ĥ' | 'ħ' => 'h',
        'ì'..='ï' | 'ĩ' | 'ī' | 'ĭ' | 'į' | 'ı' => 'i',
        'ĵ' => 'j',
        'ķ' => 'k',
        'ĺ' | 'ļ' | 'ľ' | 'ŀ' | 'ł' => 'l',
        'ñ' | 'ń' | 'ņ' | 'ň' => 'n',
        'ò'..='ö' | 'ø' | 'ō' | 'ŏ' | 'ő' => 'o',
        'ŕ' | 'ŗ' | 'ř' => 'r',
        'ß' | 'ś' | 'ŝ' | 'ş' | 'š' => 's',
        'ţ' | 'ť' | 'ŧ' => 't',
        'ù'..='ü' | 'ũ' | 'ū' | 'ŭ' | 'ů' | 'ű' | 'ų' => 'u',
        'ŵ' => 'w',
        'ý' | 'ÿ' | 'ŷ' => 'y',
        'ź' | 'ż' | 'ž' => 'z',
        other => other,
    }
}

/// Locale-style ordering for package and class names.
///
/// Names are compared by base character first (symbols, then digits, then
/// letters with accents and case ignored). Ties are broken by accents, with
/// unaccented letters first, and then by case, with lower case first.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    a.chars()
        .map(primary_weight)
        .cmp(b.chars().map(primary_weight))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| b.cmp(a))
}

/// Coverage for a single class. Leaf of the tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Class {
    name: String,
    counters: Counters,
}

impl Class {
    pub fn new(name: String, counters: Counters) -> Self {
        Self { name, counters }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl CoverageMetrics for Class {
    fn counter(&self, metric: Metric) -> Option<Counter> {
        self.counters.get(metric)
    }
}

/// Coverage for a package and the classes it contains.
#[derive(Debug, Clone, PartialEq)]
pub struct Package {
    name: String,
    counters: Counters,
    classes: Vec<Class>,
}

impl Package {
    /// Classes are sorted by name.
    pub fn new(name: String, counters: Counters, mut classes: Vec<Class>) -> Self {
        classes.sort_by(|a, b| compare_names(&a.name, &b.name));
        Self {
            name,
            counters,
            classes,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn classes(&self) -> &[Class] {
        &self.classes
    }
}

impl CoverageMetrics for Package {
    fn counter(&self, metric: Metric) -> Option<Counter> {
        self.counters.get(metric)
    }
}

/// The complete result of parsing a single coverage report.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Coverage {
    counters: Counters,
    packages: Vec<Package>,
}

impl Coverage {
    /// Packages are sorted by name.
    pub fn new(counters: Counters, mut packages: Vec<Package>) -> Self {
        packages.sort_by(|a, b| compare_names(&a.name, &b.name));
        Self { counters, packages }
    }

    pub fn packages(&self) -> &[Package] {
        &self.packages
    }

    /// Parse a JaCoCo XML report.
    pub fn from_xml(input: &[u8]) -> Self {
        crate::parsers::jacoco::parse(input)
    }

    /// Parse a JaCoCo CSV report.
    pub fn from_csv(input: &[u8]) -> Self {
        crate::parsers::csv::parse(input)
    }
}

impl CoverageMetrics for Coverage {
    fn counter(&self, metric: Metric) -> Option<Counter> {
        self.counters.get(metric)
    }
}
