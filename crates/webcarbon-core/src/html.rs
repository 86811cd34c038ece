//! Resource-reference scanning built on `lol_html`.
//!
//! The tokenizer never rejects malformed markup, so unclosed tags, stray
//! quotes and broken nesting all yield whatever references are recognisable.

use lol_html::html_content::Element;
use lol_html::{element, HtmlRewriter, Settings};
use std::cell::RefCell;

fn non_empty_attribute(el: &Element<'_, '_>, name: &str) -> Option<String> {
    el.get_attribute(name).filter(|v| !v.trim().is_empty())
}

fn push_ref(refs: &RefCell<Vec<String>>, el: &Element<'_, '_>) {
    if let Some(value) =
        non_empty_attribute(el, "src").or_else(|| non_empty_attribute(el, "href"))
    {
        refs.borrow_mut().push(value);
    }
}

/// Collects the `src` (falling back to `href` when `src` is missing or blank) of every `script`, `link` and
/// `img` element in document order. Attribute values are returned as written.
pub fn extract_resource_refs(body: &[u8]) -> Vec<String> {
    let refs: RefCell<Vec<String>> = RefCell::new(Vec::new());

    let outcome = {
        let mut rewriter = HtmlRewriter::new(
            Settings {
                element_content_handlers: vec![
                    element!("script", |el| {
                        push_ref(&refs, el);
                        Ok(())
                    }),
                    element!("link", |el| {
                        push_ref(&refs, el);
                        Ok(())
                    }),
                    element!("img", |el| {
                        push_ref(&refs, el);
                        Ok(())
                    }),
                ],
                ..Settings::default()
            },
            |_: &[u8]| {},
        );
        match rewriter.write(body) {
            Ok(()) => rewriter.end(),
            Err(e) => Err(e),
        }
    };

    if let Err(e) = outcome {
        tracing::debug!("html scan stopped early: {}", e);
    }

    refs.into_inner()
}
