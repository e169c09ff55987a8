/// Parser for JaCoCo XML coverage reports.
///
/// JaCoCo XML structure:
///   <report name="...">
///     <sessioninfo id="..." start="..." dump="..."/>
///     <package name="com/example">
///       <class name="com/example/Foo" sourcefilename="Foo.java">
///         <method name="doStuff" desc="()V" line="10">
///           <counter type="INSTRUCTION" missed="0" covered="5"/>
///         </method>
///         <counter type="INSTRUCTION" missed="2" covered="10"/>
///         <counter type="LINE" missed="1" covered="5"/>
///         ...
///       </class>
///       <sourcefile name="Foo.java">...</sourcefile>
///       <counter type="INSTRUCTION" missed="2" covered="10"/>
///       ...
///     </package>
///     <counter type="INSTRUCTION" missed="2" covered="10"/>
///     ...
///   </report>
///
/// Only the `<counter>` elements that are direct children of `<report>`,
/// `<package>` and `<class>` are read; JaCoCo has already aggregated them
/// at each level. Counters nested in `<method>` or `<sourcefile>` are
/// ignored.
///
/// Names are normalized on the way in:
///   - package `com/example` becomes `com.example`
///   - class `com/example/Foo` becomes `Foo`
///
/// A report that breaks off part way (truncated file, mismatched tags)
/// keeps everything read up to that point.
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use super::{get_attr, parse_count, Parser};
use crate::detect::Format;
use crate::model::*;

/// JaCoCo XML format parser.
pub struct JacocoParser;

impl Parser for JacocoParser {
    fn format(&self) -> Format {
        Format::Jacoco
    }

    fn parse(&self, input: &[u8]) -> Coverage {
        parse(input)
    }
}

/// A `<counter>` element as it appears in the report.
#[derive(Debug)]
struct CounterElement {
    kind: Option<String>,
    missed: Option<u64>,
    covered: Option<u64>,
}

impl CounterElement {
    fn from_start(e: &BytesStart) -> Self {
        Self {
            kind: get_attr(e, b"type"),
            missed: get_attr(e, b"missed").and_then(|v| parse_count(&v)),
            covered: get_attr(e, b"covered").and_then(|v| parse_count(&v)),
        }
    }
}

/// First counter of the requested type. A counter that is present but
/// lacks a usable `missed`/`covered` value reads the same as no counter.
fn find_by_type(counters: &[CounterElement], metric: Metric) -> Option<Counter> {
    let element = counters
        .iter()
        .find(|c| c.kind.as_deref() == Some(metric.as_str()))?;
    Some(Counter::new(element.missed?, element.covered?))
}

fn collect_counters(counters: &[CounterElement]) -> Counters {
    Counters::from_fn(|metric| find_by_type(counters, metric))
}

/// `pkg/name/a` → `pkg.name.a`
fn package_name(name: &str) -> String {
    name.replace('/', ".")
}

/// `pkg/name/a/MyClass` → `MyClass`
fn class_name(name: &str) -> String {
    match name.rfind('/') {
        Some(idx) => name[idx + 1..].to_string(),
        None => name.to_string(),
    }
}

#[derive(Debug, Clone, Copy)]
enum Frame {
    Report,
    Package,
    Class,
    Other,
}

struct PackageElement {
    name: String,
    counters: Vec<CounterElement>,
    classes: Vec<Class>,
}

struct ClassElement {
    name: String,
    counters: Vec<CounterElement>,
}

/// Accumulates the tree while walking the event stream.
#[derive(Default)]
struct Builder {
    stack: Vec<Frame>,
    report: Vec<CounterElement>,
    packages: Vec<Package>,
    package: Option<PackageElement>,
    class: Option<ClassElement>,
}

impl Builder {
    fn open(&mut self, e: &BytesStart) {
        let parent = self.stack.last().copied();
        let frame = match (parent, e.name().as_ref()) {
            (None, b"report") => Frame::Report,
            (Some(Frame::Report), b"package") => {
                let name = get_attr(e, b"name").unwrap_or_default();
                self.package = Some(PackageElement {
                    name: package_name(&name),
                    counters: Vec::new(),
                    classes: Vec::new(),
                });
                Frame::Package
            }
            (Some(Frame::Package), b"class") => {
                let name = get_attr(e, b"name").unwrap_or_default();
                self.class = Some(ClassElement {
                    name: class_name(&name),
                    counters: Vec::new(),
                });
                Frame::Class
            }
            (Some(level), b"counter") => {
                let counter = CounterElement::from_start(e);
                match level {
                    Frame::Report => self.report.push(counter),
                    Frame::Package => {
                        if let Some(p) = self.package.as_mut() {
                            p.counters.push(counter);
                        }
                    }
                    Frame::Class => {
                        if let Some(c) = self.class.as_mut() {
                            c.counters.push(counter);
                        }
                    }
                    Frame::Other => {}
                }
                Frame::Other
            }
            _ => Frame::Other,
        };
        self.stack.push(frame);
    }

    fn close(&mut self) {
        match self.stack.pop() {
            Some(Frame::Package) => {
                if let Some(p) = self.package.take() {
                    let counters = collect_counters(&p.counters);
                    self.packages.push(Package::new(p.name, counters, p.classes));
                }
            }
            Some(Frame::Class) => {
                if let (Some(c), Some(p)) = (self.class.take(), self.package.as_mut()) {
                    let counters = collect_counters(&c.counters);
                    p.classes.push(Class::new(c.name, counters));
                }
            }
            _ => {}
        }
    }

    fn finish(mut self) -> Coverage {
        while !self.stack.is_empty() {
            self.close();
        }
        Coverage::new(collect_counters(&self.report), self.packages)
    }
}

/// Parse JaCoCo XML coverage data from raw bytes.
pub fn parse(input: &[u8]) -> Coverage {
    let mut reader = Reader::from_reader(input);
    reader.trim_text(true);

    let mut builder = Builder::default();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Err(e) => {
                eprintln!(
                    "Warning: XML parse error at position {}: {e}; using coverage read so far",
                    reader.buffer_position()
                );
                break;
            }
            Ok(Event::Eof) => break,
            Ok(Event::Start(ref e)) => builder.open(e),
            Ok(Event::Empty(ref e)) => {
                builder.open(e);
                builder.close();
            }
            Ok(Event::End(_)) => builder.close(),
            _ => {}
        }
        buf.clear();
    }

    builder.finish()
}
