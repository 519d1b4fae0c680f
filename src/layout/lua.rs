//! Lua bindings.
//!
//! Builds the `ctx` table a layout function receives and installs the
//! `veneer` library table (`define`, `attrs`, `meta.*`) into a state.
//!
//! ```lua
//! local meta = veneer.meta
//!
//! return veneer.define(function(ctx)
//!   ctx.head.crossorigin("anonymous")
//!   ctx.head.meta(meta.description("My site"))
//!   ctx.head.link({ rel = "stylesheet", href = "/main.css" })
//!   ctx.body.start("<div id=\"app\"></div>")
//!   ctx.body["end"]("<script src=\"/app.js\"></script>")
//!   ctx.on.error(function(err) print(err) end)
//! end)
//! ```

use mlua::{FromLuaMulti, Function, Lua, Table, Value};
use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use super::LayoutContext;
use crate::html::{AttrValue, Attrs, CrossOrigin, LinkAttrs, MetaAttrs, ScriptAttrs, attrs};
use crate::log;
use crate::meta::{self, TwitterCard};

pub(crate) type SharedContext = Rc<RefCell<LayoutContext>>;

// ============================================================================
// ctx table
// ============================================================================

/// Wrap a context method as a Lua function.
fn bind<A, F>(lua: &Lua, ctx: &SharedContext, method: F) -> mlua::Result<Function>
where
    A: FromLuaMulti,
    F: Fn(&mut LayoutContext, A) -> mlua::Result<()> + 'static,
{
    let ctx = Rc::clone(ctx);
    lua.create_function(move |_, args: A| method(&mut ctx.borrow_mut(), args))
}

/// Build the `ctx` table passed to every layout function.
pub(crate) fn context_table(lua: &Lua, ctx: &SharedContext) -> mlua::Result<Table> {
    let head = lua.create_table()?;
    head.set(
        "meta",
        bind(lua, ctx, |c, t: Table| {
            c.meta(table_to_attrs(&t, MetaAttrs::ORDER)?);
            Ok(())
        })?,
    )?;
    head.set(
        "link",
        bind(lua, ctx, |c, t: Table| {
            c.link(table_to_attrs(&t, LinkAttrs::ORDER)?);
            Ok(())
        })?,
    )?;
    head.set(
        "script",
        bind(lua, ctx, |c, t: Table| {
            c.script(table_to_attrs(&t, ScriptAttrs::ORDER)?);
            Ok(())
        })?,
    )?;
    head.set(
        "raw",
        bind(lua, ctx, |c, html: String| {
            c.raw(html);
            Ok(())
        })?,
    )?;
    head.set(
        "crossorigin",
        bind(lua, ctx, |c, value: String| {
            let value = value
                .parse::<CrossOrigin>()
                .map_err(mlua::Error::RuntimeError)?;
            c.set_crossorigin(value);
            Ok(())
        })?,
    )?;

    let body = lua.create_table()?;
    body.set(
        "start",
        bind(lua, ctx, |c, html: String| {
            c.body_start(html);
            Ok(())
        })?,
    )?;
    let body_end = bind(lua, ctx, |c, html: String| {
        c.body_end(html);
        Ok(())
    })?;
    // `end` is a keyword, `append` spares scripts the bracket syntax.
    body.set("end", body_end.clone())?;
    body.set("append", body_end)?;

    let on = lua.create_table()?;
    on.set(
        "error",
        bind(lua, ctx, |c, handler: Function| {
            c.on_error(move |err| {
                if let Err(e) = handler.call::<()>(err.to_string()) {
                    log!("error"; "error handler failed: {}", e);
                }
            });
            Ok(())
        })?,
    )?;

    let table = lua.create_table()?;
    table.set("head", head)?;
    table.set("body", body)?;
    table.set("on", on)?;
    Ok(table)
}

// ============================================================================
// Attribute conversion
// ============================================================================

/// Convert a Lua value into an attribute value.
///
/// Anything but strings, numbers and booleans is dropped.
fn attr_value(value: &Value) -> Option<AttrValue> {
    match value {
        Value::String(s) => Some(AttrValue::Text(s.to_string_lossy().to_string())),
        Value::Integer(n) => Some(AttrValue::Integer(i64::from(*n))),
        Value::Number(n) => Some(AttrValue::Number(*n)),
        Value::Boolean(b) => Some(AttrValue::Bool(*b)),
        _ => None,
    }
}

/// Convert a descriptor table into [`Attrs`].
///
/// Lua tables are unordered: keys listed in `order` come first, remaining
/// keys follow in lexical order and `crossorigin` is always last.
pub(crate) fn table_to_attrs(table: &Table, order: &[&str]) -> mlua::Result<Attrs> {
    let mut known: Vec<Option<AttrValue>> = vec![None; order.len()];
    let mut extra: Vec<(String, AttrValue)> = Vec::new();
    let mut crossorigin = None;

    for pair in table.pairs::<Value, Value>() {
        let (key, value) = pair?;
        let Value::String(key) = key else {
            continue;
        };
        let Some(value) = attr_value(&value) else {
            continue;
        };

        let key = match key.to_string_lossy().to_string() {
            k if k == "http_equiv" => "http-equiv".to_owned(),
            k => k,
        };

        if key == "crossorigin" {
            crossorigin = Some(value);
        } else if let Some(i) = order.iter().position(|k| *k == key) {
            known[i] = Some(value);
        } else {
            extra.push((key, value));
        }
    }

    extra.sort_by(|a, b| a.0.cmp(&b.0));

    let mut map = Attrs::new();
    for (key, value) in order.iter().zip(known) {
        if let Some(value) = value {
            map.set(*key, value);
        }
    }
    for (key, value) in extra {
        map.set(key, value);
    }
    if let Some(value) = crossorigin {
        map.set("crossorigin", value);
    }
    Ok(map)
}

fn meta_table(lua: &Lua, m: &MetaAttrs) -> mlua::Result<Table> {
    let table = lua.create_table()?;
    table.set("charset", m.charset.as_deref())?;
    table.set("name", m.name.as_deref())?;
    table.set("property", m.property.as_deref())?;
    table.set("http-equiv", m.http_equiv.as_deref())?;
    table.set("content", m.content.as_deref())?;
    Ok(table)
}

// ============================================================================
// veneer library table
// ============================================================================

/// Install the global `veneer` table.
pub(crate) fn install_prelude(lua: &Lua) -> mlua::Result<()> {
    let veneer = lua.create_table()?;
    veneer.set("define", lua.create_function(|_, layout: Function| Ok(layout))?)?;
    veneer.set(
        "attrs",
        lua.create_function(|_, t: Table| Ok(attrs(&table_to_attrs(&t, &[])?)))?,
    )?;
    veneer.set("meta", meta_library(lua)?)?;

    lua.globals().set("veneer", veneer)
}

fn meta_library(lua: &Lua) -> mlua::Result<Table> {
    let lib = lua.create_table()?;

    lib.set(
        "description",
        lua.create_function(|lua, content: String| meta_table(lua, &meta::description(content)))?,
    )?;
    lib.set(
        "charset",
        lua.create_function(|lua, value: Option<String>| {
            let value = value.unwrap_or_else(|| meta::DEFAULT_CHARSET.to_owned());
            meta_table(lua, &meta::charset(value))
        })?,
    )?;
    lib.set(
        "viewport",
        lua.create_function(|lua, content: Option<String>| {
            let content = content.unwrap_or_else(|| meta::DEFAULT_VIEWPORT.to_owned());
            meta_table(lua, &meta::viewport(content))
        })?,
    )?;
    lib.set(
        "og_title",
        lua.create_function(|lua, content: String| meta_table(lua, &meta::og_title(content)))?,
    )?;
    lib.set(
        "og_description",
        lua.create_function(|lua, content: String| {
            meta_table(lua, &meta::og_description(content))
        })?,
    )?;
    lib.set(
        "og_image",
        lua.create_function(|lua, url: String| meta_table(lua, &meta::og_image(url)))?,
    )?;
    lib.set(
        "twitter_card",
        lua.create_function(|lua, card: String| {
            let card = TwitterCard::parse(&card).ok_or_else(|| {
                mlua::Error::RuntimeError(format!(
                    "invalid twitter card `{card}` (expected \"summary\" or \"summary_large_image\")"
                ))
            })?;
            meta_table(lua, &meta::twitter_card(card))
        })?,
    )?;
    lib.set(
        "custom_robot",
        lua.create_function(|lua, (name, content): (String, String)| {
            meta_table(lua, &meta::custom_robot(name, content))
        })?,
    )?;
    lib.set(
        "robots_directive",
        lua.create_function(|lua, (allow, bots): (Option<bool>, Option<Vec<String>>)| {
            let allow = allow.unwrap_or(true);
            let metas = match bots {
                Some(bots) => meta::robots_directive(allow, &bots),
                None => meta::robots_directive(allow, meta::DEFAULT_BOTS),
            };
            let tables = metas
                .iter()
                .map(|m| meta_table(lua, m))
                .collect::<mlua::Result<Vec<_>>>()?;
            lua.create_sequence_from(tables)
        })?,
    )?;

    let names = lua.create_table()?;
    for (key, value) in [
        ("description", meta::names::DESCRIPTION),
        ("viewport", meta::names::VIEWPORT),
        ("charset", meta::names::CHARSET),
        ("robots", meta::names::ROBOTS),
        ("author", meta::names::AUTHOR),
        ("og_title", meta::names::OG_TITLE),
        ("og_description", meta::names::OG_DESCRIPTION),
        ("og_image", meta::names::OG_IMAGE),
        ("og_url", meta::names::OG_URL),
        ("twitter_card", meta::names::TWITTER_CARD),
        ("twitter_title", meta::names::TWITTER_TITLE),
        ("twitter_description", meta::names::TWITTER_DESCRIPTION),
    ] {
        names.set(key, value)?;
    }
    lib.set("names", names)?;

    Ok(lib)
}

/// Prepend `dir` to `package.path` so layouts can `require` sibling modules.
///
/// `package.path` cannot escape `;` or `?`, so a directory containing either
/// keeps the base path.
pub(crate) fn set_search_dir(lua: &Lua, base_path: &str, dir: Option<&Path>) -> mlua::Result<()> {
    let package: Table = lua.globals().get("package")?;
    let path = match dir.map(|d| d.to_string_lossy()) {
        Some(dir) if dir.contains([';', '?']) => {
            log!("warning"; "`require` of sibling modules unavailable in {}", dir);
            base_path.to_owned()
        }
        Some(dir) => format!("{dir}/?.lua;{dir}/?/init.lua;{base_path}"),
        None => base_path.to_owned(),
    };
    package.set("path", path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval_attrs(lua: &Lua, src: &str, order: &[&str]) -> String {
        let table: Table = lua.load(src).eval().unwrap();
        attrs(&table_to_attrs(&table, order).unwrap())
    }

    #[test]
    fn test_table_to_attrs_canonical_order() {
        let lua = Lua::new();
        let out = eval_attrs(
            &lua,
            r#"{ href = "/a.css", crossorigin = "anonymous", media = "print", rel = "stylesheet" }"#,
            LinkAttrs::ORDER,
        );
        assert_eq!(
            out,
            r#"rel="stylesheet" href="/a.css" media="print" crossorigin="anonymous""#
        );
    }

    #[test]
    fn test_table_to_attrs_drops_invalid_values() {
        let lua = Lua::new();
        let out = eval_attrs(
            &lua,
            r#"{ src = "/a.js", defer = true, async = false, extra = {}, cb = print, [1] = "x", width = 3, scale = 1.5 }"#,
            ScriptAttrs::ORDER,
        );
        assert_eq!(out, r#"src="/a.js" defer scale="1.5" width="3""#);
    }

    #[test]
    fn test_http_equiv_alias() {
        let lua = Lua::new();
        let out = eval_attrs(
            &lua,
            r#"{ content = "0", http_equiv = "refresh" }"#,
            MetaAttrs::ORDER,
        );
        assert_eq!(out, r#"http-equiv="refresh" content="0""#);
    }

    #[test]
    fn test_prelude_meta_helpers() {
        let lua = Lua::new();
        install_prelude(&lua).unwrap();

        let out: String = lua
            .load(r#"return veneer.attrs(veneer.meta.og_title("Hi"))"#)
            .eval()
            .unwrap();
        assert_eq!(out, r#"content="Hi" property="og:title""#);

        let count: i64 = lua
            .load("return #veneer.meta.robots_directive(false)")
            .eval()
            .unwrap();
        assert_eq!(count, meta::DEFAULT_BOTS.len() as i64);

        let bot: String = lua
            .load(r#"return veneer.meta.robots_directive(true, { "bingbot" })[1].content"#)
            .eval()
            .unwrap();
        assert_eq!(bot, "index, follow");

        let charset: String = lua
            .load("return veneer.meta.charset().charset")
            .eval()
            .unwrap();
        assert_eq!(charset, "utf-8");
    }

    #[test]
    fn test_prelude_define_returns_function() {
        let lua = Lua::new();
        install_prelude(&lua).unwrap();
        let value: Value = lua
            .load("return veneer.define(function(ctx) end)")
            .eval()
            .unwrap();
        assert!(matches!(value, Value::Function(_)));
    }

    #[test]
    fn test_context_table_collects() {
        let lua = Lua::new();
        let ctx: SharedContext = Rc::new(RefCell::new(LayoutContext::new()));
        let table = context_table(&lua, &ctx).unwrap();

        let layout: Function = lua
            .load(
                r#"
                return function(ctx)
                  ctx.head.crossorigin("use-credentials")
                  ctx.head.script({ src = "/a.js" })
                  ctx.head.raw("<!-- raw -->")
                  ctx.body.start("<main>")
                  ctx.body["end"]("</main>")
                  ctx.body.append("<footer></footer>")
                end
                "#,
            )
            .eval()
            .unwrap();
        layout.call::<()>(table).unwrap();

        let ctx = ctx.borrow();
        assert_eq!(
            ctx.fragments().head,
            vec![
                r#"<script src="/a.js" crossorigin="use-credentials"></script>"#,
                "<!-- raw -->",
            ]
        );
        assert_eq!(ctx.fragments().body_start, vec!["<main>"]);
        assert_eq!(ctx.fragments().body_end, vec!["</main>", "<footer></footer>"]);
    }

    #[test]
    fn test_invalid_crossorigin_raises() {
        let lua = Lua::new();
        let ctx: SharedContext = Rc::new(RefCell::new(LayoutContext::new()));
        let table = context_table(&lua, &ctx).unwrap();

        let layout: Function = lua
            .load(r#"return function(ctx) ctx.head.crossorigin("omit") end"#)
            .eval()
            .unwrap();
        let err = layout.call::<()>(table).unwrap_err();
        assert!(err.to_string().contains("invalid crossorigin value"));
        assert_eq!(ctx.borrow().crossorigin(), None);
    }

    #[test]
    fn test_search_dir_prepended() {
        let lua = Lua::new();
        set_search_dir(&lua, "BASE", Some(Path::new("/site/blog"))).unwrap();
        let path: String = lua.load("return package.path").eval().unwrap();
        assert_eq!(path, "/site/blog/?.lua;/site/blog/?/init.lua;BASE");
    }

    #[test]
    fn test_search_dir_with_separator_keeps_base() {
        let lua = Lua::new();
        for dir in ["/site/a;b", "/site/what?"] {
            set_search_dir(&lua, "BASE", Some(Path::new(dir))).unwrap();
            let path: String = lua.load("return package.path").eval().unwrap();
            assert_eq!(path, "BASE");
        }
    }
}
