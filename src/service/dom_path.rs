//! Positional lookups over a parsed document.
//!
//! A lookup is a list of [`Step`]s evaluated left to right from a starting
//! element. The first step that matches nothing stops the walk and is reported
//! back, so callers can map each failure to their own error.

use scraper::ElementRef;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// First descendant with this tag, in document order.
    Find(&'static str),
    /// The `n`th direct child with this tag, counting only that tag.
    Child(&'static str, usize),
    /// Last direct child with this tag.
    LastChild(&'static str),
    /// First element sharing a parent with the current one that has this tag.
    Sibling(&'static str),
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("step {index} ({step:?}) matched nothing")]
pub struct PathError {
    pub index: usize,
    pub step: Step,
}

fn is_tag(element: &ElementRef, tag: &str) -> bool {
    element.value().name().eq_ignore_ascii_case(tag)
}

fn child_elements<'a>(element: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    element.children().filter_map(ElementRef::wrap)
}

impl Step {
    pub fn apply<'a>(&self, element: ElementRef<'a>) -> Option<ElementRef<'a>> {
        match *self {
            Step::Find(tag) => element
                .descendants()
                .skip(1)
                .filter_map(ElementRef::wrap)
                .find(|e| is_tag(e, tag)),
            Step::Child(tag, n) => child_elements(element).filter(|e| is_tag(e, tag)).nth(n),
            Step::LastChild(tag) => child_elements(element).filter(|e| is_tag(e, tag)).last(),
            Step::Sibling(tag) => {
                let parent = element.parent().and_then(ElementRef::wrap)?;
                child_elements(parent).find(|e| e.id() != element.id() && is_tag(e, tag))
            }
        }
    }
}

pub fn resolve<'a>(start: ElementRef<'a>, path: &[Step]) -> Result<ElementRef<'a>, PathError> {
    path.iter()
        .enumerate()
        .try_fold(start, |current, (index, step)| {
            step.apply(current).ok_or(PathError { index, step: *step })
        })
}

/// All text below `element`, trimmed.
pub fn text_of(element: ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Resolves `path` and returns the trimmed text, treating empty text as a miss.
pub fn resolve_text(start: ElementRef, path: &[Step]) -> Option<String> {
    let text = text_of(resolve(start, path).ok()?);
    (!text.is_empty()).then_some(text)
}
