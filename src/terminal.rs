//! 终端前端
//!
//! 把路由处理函数的 `Response` 渲染为文本，并用逐行输入驱动一局游戏。

use std::fmt::Write as _;
use std::io::{BufRead, Write};

use crate::database::dto::PlayerForm;
use crate::database::repository::players_repository::LeaderboardOrder;
use crate::error::Result;
use crate::routes::{
    self, AppState, Button, CustomizeView, LeaderboardView, LevelView, Response, Route, Session,
};

pub const GAME_TITLE: &str = "Debrand";

/// 渲染一个响应
pub fn render(response: &Response) -> String {
    match response {
        Response::Redirect(route) => format!("-> {}\n", route.path()),
        Response::Title => render_title(),
        Response::Customize(view) => render_customize(view),
        Response::Level(view) => render_level(view),
        Response::Leaderboard(view) => render_leaderboard(view),
    }
}

fn render_title() -> String {
    format!(
        "== {} ==\nHow much of the world around you is trying to sell you something?\n\nPress Enter to begin, or type q to quit.\n",
        GAME_TITLE
    )
}

fn render_customize(view: &CustomizeView) -> String {
    let mut out = String::new();
    if let Some(error) = &view.error {
        let _ = writeln!(out, "! {}", error);
    }
    out.push_str("What is your name?\n");
    out
}

fn render_level(view: &LevelView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "== {} ==", view.name);
    let _ = writeln!(out, "{} | score {}", view.playername, view.score);
    out.push('\n');
    let _ = writeln!(out, "{}", view.description.trim_end());

    if !view.img_src.is_empty() {
        if view.img_attribution.is_empty() {
            let _ = writeln!(out, "[image: {}]", view.img_src);
        } else {
            let _ = writeln!(out, "[image: {} / {}]", view.img_src, view.img_attribution);
        }
    }

    if let Some(sidebar) = &view.sidebar {
        out.push('\n');
        let _ = writeln!(out, "Levels played: {}", sidebar.levels_played);
        for (variety, tally) in &sidebar.varieties {
            let _ = writeln!(
                out,
                "  {}: {} seen, {} points",
                variety.display_name(),
                tally.encountered,
                tally.points
            );
        }
    }

    out.push('\n');
    for (i, button) in view.buttons.iter().enumerate() {
        let _ = writeln!(out, "{}) {}", i + 1, button.label);
    }
    out
}

fn render_leaderboard(view: &LeaderboardView) -> String {
    let mut out = String::from("== Leaderboard ==\n");
    if view.entries.is_empty() {
        out.push_str("Nobody has finished yet.\n");
        return out;
    }

    for (rank, entry) in view.entries.iter().enumerate() {
        let marker = if entry.highlighted { " <- you" } else { "" };
        let _ = writeln!(
            out,
            "{:>3}. {:<24} {:>6}{}",
            rank + 1,
            entry.name,
            entry.score,
            marker
        );
    }
    out
}

/// 解析玩家输入的选项编号（从 1 开始）
pub fn pick_button<'a>(buttons: &'a [Button], input: &str) -> Option<&'a Button> {
    let index: usize = input.trim().parse().ok()?;
    index.checked_sub(1).and_then(|i| buttons.get(i))
}

/// 解析玩家直接输入的路径，只接受以 `/` 开头的输入
pub fn typed_route(input: &str) -> Option<Route> {
    let input = input.trim();
    if !input.starts_with('/') {
        return None;
    }
    Route::from_path(input)
}

/// 读取一行，EOF 时返回 None
fn read_line<R: BufRead>(input: &mut R) -> Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

/// 进行一局游戏，直到看到排行榜或输入结束
///
/// 返回最终的会话，调用方可据此查询玩家
pub async fn play<R, W>(state: &AppState, mut input: R, mut output: W) -> Result<Session>
where
    R: BufRead,
    W: Write,
{
    let mut session = Session::default();
    let mut route = Route::Title;

    loop {
        route = match route {
            Route::Title => {
                output.write_all(render(&routes::title().await).as_bytes())?;
                match read_line(&mut input)? {
                    Some(line) if line.trim().eq_ignore_ascii_case("q") => break,
                    Some(_) => Route::Customize,
                    None => break,
                }
            }
            Route::Customize => {
                output.write_all(render(&routes::customize_form().await).as_bytes())?;
                let Some(name) = read_line(&mut input)? else {
                    break;
                };

                match routes::customize(state, &mut session, PlayerForm { name }).await? {
                    Response::Redirect(next) => next,
                    response => {
                        // 表单被拒绝：显示错误后再次询问
                        output.write_all(render(&response).as_bytes())?;
                        continue;
                    }
                }
            }
            Route::Level(slug) => match routes::level(state, &session, Some(&slug)).await? {
                Response::Level(view) => {
                    output.write_all(render_level(&view).as_bytes())?;
                    match choose(&view.buttons, &mut input, &mut output)? {
                        Some(next) => next,
                        None => break,
                    }
                }
                Response::Redirect(next) => next,
                other => {
                    output.write_all(render(&other).as_bytes())?;
                    break;
                }
            },
            Route::Leaderboard => {
                let response =
                    routes::leaderboard(state, &session, LeaderboardOrder::default()).await?;
                output.write_all(render(&response).as_bytes())?;
                break;
            }
        };
    }

    output.flush()?;
    Ok(session)
}

/// 读取选项直到输入有效
fn choose<R: BufRead, W: Write>(
    buttons: &[Button],
    input: &mut R,
    output: &mut W,
) -> Result<Option<Route>> {
    loop {
        write!(output, "> ")?;
        output.flush()?;

        let Some(line) = read_line(input)? else {
            return Ok(None);
        };
        if let Some(button) = pick_button(buttons, &line) {
            return Ok(Some(button.route.clone()));
        }
        // 也可以直接输入路径，例如 /level/<slug>/
        if let Some(route) = typed_route(&line) {
            return Ok(Some(route));
        }
        writeln!(output, "Choose 1-{}, or type a path such as /level/<slug>/.", buttons.len())?;
    }
}
