use crate::error::ParseError;
use crate::models::quiz::{ContentType, Correctness, Fragment, Question, Quiz, Response};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::path::Path;

/// 代码块未声明 `startline` 时的起始行号
const DEFAULT_START_LINE: i64 = 1;

/// 从 XML 文件加载测验
///
/// `strict` 为 true 时在解析后执行语义校验，失败同样作为解析错误返回
pub fn load_quiz(path: &Path, strict: bool) -> Result<Quiz, ParseError> {
    let content = std::fs::read_to_string(path).map_err(|source| ParseError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let quiz = parse_quiz_str(&content)?;
    tracing::debug!(
        "解析完成: {} (测验 {}，共 {} 题)",
        path.display(),
        quiz.number,
        quiz.questions.len()
    );

    if strict {
        quiz.validate()?;
    }

    Ok(quiz)
}

/// 将 XML 文本解析为测验模型（只做结构解析，不做语义校验）
pub fn parse_quiz_str(xml: &str) -> Result<Quiz, ParseError> {
    let root = read_tree(xml)?;
    if root.name != "quiz" {
        return Err(ParseError::UnexpectedRoot { found: root.name });
    }

    let raw_number = root.required_attr("quiznum")?;
    let number = raw_number
        .trim()
        .parse::<u32>()
        .ok()
        .filter(|n| *n > 0)
        .ok_or_else(|| ParseError::InvalidNumber {
            element: root.name.clone(),
            attribute: "quiznum",
            value: raw_number.to_string(),
        })?;

    let questions = root
        .children_named("question")
        .map(parse_question)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Quiz::new(number, questions))
}

fn parse_question(element: &Element) -> Result<Question, ParseError> {
    let prompt = element
        .children_named("text")
        .map(parse_fragment)
        .collect::<Result<Vec<_>, _>>()?;

    let responses = element
        .children_named("response")
        .map(parse_response)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Question::new(prompt, responses))
}

fn parse_response(element: &Element) -> Result<Response, ParseError> {
    let marker = element.required_attr("correct")?;
    let correctness =
        Correctness::from_marker(marker).ok_or_else(|| ParseError::InvalidCorrectness {
            value: marker.to_string(),
        })?;

    Ok(Response::new(parse_fragment(element)?, correctness))
}

/// 解析一个 `<text>` 或 `<response>` 的内容
///
/// 代码类型读取 `<code>` 子元素，每行原样保留；其它类型取自身文本并去除首尾空白
///
/// `startline` 限定在 `i32` 范围内，代码文本没有包在 `<code>` 中时报错
fn parse_fragment(element: &Element) -> Result<Fragment, ParseError> {
    let content_type = ContentType::from_tag(element.required_attr("texttype")?);

    if content_type != ContentType::Code {
        return Ok(Fragment::inline(content_type, element.text.trim()));
    }

    let start_line = match element.attr("startline") {
        Some(raw) => raw
            .trim()
            .parse::<i32>()
            .map(i64::from)
            .map_err(|_| ParseError::InvalidNumber {
                element: element.name.clone(),
                attribute: "startline",
                value: raw.to_string(),
            })?,
        None => DEFAULT_START_LINE,
    };

    let lines: Vec<String> = element
        .children_named("code")
        .map(|line| line.text.clone())
        .collect();

    if lines.is_empty() && !element.text.trim().is_empty() {
        return Err(ParseError::MissingCodeLines {
            element: element.name.clone(),
        });
    }

    Ok(Fragment::code(start_line, lines))
}

// ========== 通用 XML 元素树 ==========

/// 简化的 XML 元素：名称、属性、直接文本与子元素
#[derive(Debug, Default)]
struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    /// 元素自身的字符数据（不含子元素文本），已反转义
    text: String,
    children: Vec<Element>,
}

impl Element {
    fn from_start(start: &BytesStart<'_>) -> Result<Self, ParseError> {
        let mut attributes = Vec::new();
        for attribute in start.attributes() {
            let attribute = attribute?;
            let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
            let value = attribute.unescape_value()?.into_owned();
            attributes.push((key, value));
        }

        Ok(Self {
            name: String::from_utf8_lossy(start.name().as_ref()).into_owned(),
            attributes,
            ..Default::default()
        })
    }

    fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn required_attr(&self, key: &'static str) -> Result<&str, ParseError> {
        self.attr(key).ok_or_else(|| ParseError::MissingAttribute {
            element: self.name.clone(),
            attribute: key,
        })
    }

    fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }
}

/// 读取整个文档为元素树，返回第一个根元素
fn read_tree(xml: &str) -> Result<Element, ParseError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event()? {
            Event::Start(start) => stack.push(Element::from_start(&start)?),
            Event::Empty(start) => {
                let element = Element::from_start(&start)?;
                attach(&mut stack, &mut root, element);
            }
            Event::End(_) => {
                if let Some(element) = stack.pop() {
                    attach(&mut stack, &mut root, element);
                }
            }
            Event::Text(text) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&text.unescape()?);
                }
            }
            Event::CData(data) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&String::from_utf8_lossy(&data));
                }
            }
            Event::Eof => break,
            // 声明、注释、处理指令、DOCTYPE
            _ => {}
        }
    }

    if let Some(open) = stack.first() {
        return Err(ParseError::UnclosedElement {
            element: open.name.clone(),
        });
    }

    root.ok_or(ParseError::EmptyDocument)
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None => {
            if root.is_none() {
                *root = Some(element);
            }
        }
    }
}
