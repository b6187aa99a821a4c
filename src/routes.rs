//! 路由处理
//!
//! 与具体 Web 框架无关：每个处理函数接收会话和请求参数，返回要渲染的视图或重定向。
//! 宿主（终端前端或 HTTP 适配层）负责把 `Response` 转成实际输出。
//!
//! | 路径                 | 处理函数                          |
//! |----------------------|-----------------------------------|
//! | `/`                  | [`title`]                         |
//! | `/customize/`        | [`customize_form`] / [`customize`]|
//! | `/leaderboard/`      | [`leaderboard`]                   |
//! | `/level/<slug>/`     | [`level`]                         |

use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::database::dto::PlayerForm;
use crate::database::repository::players_repository::LeaderboardOrder;
use crate::database::service;
use crate::entity::players;
use crate::error::Result;
use crate::game::progression::{self, ChoiceTarget, Progress};
use crate::game::scoring::SidebarData;

/// 处理请求所需的共享状态
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: GameConfig,
}

impl AppState {
    pub fn new(db: DatabaseConnection, config: GameConfig) -> Self {
        AppState { db, config }
    }
}

/// 会话：只保存当前玩家的 ID
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub player_id: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Route {
    Title,
    Customize,
    Leaderboard,
    Level(String),
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Title => "/".to_string(),
            Route::Customize => "/customize/".to_string(),
            Route::Leaderboard => "/leaderboard/".to_string(),
            Route::Level(slug) => format!("/level/{}/", slug),
        }
    }

    /// 解析请求路径，`/level/` 不带 slug 时返回 None，由调用方使用入口关卡
    pub fn from_path(path: &str) -> Option<Route> {
        let trimmed = path.trim_matches('/');
        let mut segments = trimmed.split('/');

        match (segments.next(), segments.next(), segments.next()) {
            (Some(""), None, None) => Some(Route::Title),
            (Some("customize"), None, None) => Some(Route::Customize),
            (Some("leaderboard"), None, None) => Some(Route::Leaderboard),
            (Some("level"), Some(slug), None) if !slug.is_empty() => {
                Some(Route::Level(slug.to_string()))
            }
            _ => None,
        }
    }
}

impl From<ChoiceTarget> for Route {
    fn from(target: ChoiceTarget) -> Self {
        match target {
            ChoiceTarget::Level(slug) => Route::Level(slug),
            ChoiceTarget::Leaderboard => Route::Leaderboard,
        }
    }
}

/// 关卡页上的按钮
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Button {
    pub label: String,
    pub route: Route,
}

impl Button {
    pub fn url(&self) -> String {
        self.route.path()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomizeView {
    pub form: PlayerForm,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelView {
    pub playername: String,
    pub score: i64,
    pub name: String,
    pub description: String,
    pub img_src: String,
    pub img_attribution: String,
    pub buttons: Vec<Button>,
    pub sidebar: Option<SidebarData>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    pub slug: String,
    pub score: i64,
    /// 是否为当前会话的玩家
    pub highlighted: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardView {
    pub entries: Vec<LeaderboardEntry>,
    pub current_player_id: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Response {
    Redirect(Route),
    Title,
    Customize(CustomizeView),
    Level(Box<LevelView>),
    Leaderboard(LeaderboardView),
}

/// 会话对应的玩家；会话为空或玩家已被删除时返回 None
async fn session_player(state: &AppState, session: &Session) -> Result<Option<players::Model>> {
    match session.player_id {
        Some(id) => service::find_player(&state.db, id).await,
        None => Ok(None),
    }
}

/// 标题页
pub async fn title() -> Response {
    Response::Title
}

/// GET /customize/
pub async fn customize_form() -> Response {
    Response::Customize(CustomizeView::default())
}

/// POST /customize/
///
/// 创建成功后把玩家 ID 写入会话并跳转到入口关卡；
/// 名称无效或 slug 冲突时带错误信息重新显示表单
pub async fn customize(state: &AppState, session: &mut Session, form: PlayerForm) -> Result<Response> {
    match service::create_player(&state.db, form.clone()).await {
        Ok(player) => {
            session.player_id = Some(player.id);
            Ok(Response::Redirect(Route::Level(state.config.entry_slug.clone())))
        }
        Err(e) if e.is_client_error() => {
            log::warn!("角色创建被拒绝: {}", e);
            Ok(Response::Customize(CustomizeView {
                form,
                error: Some(e.to_string()),
            }))
        }
        Err(e) => Err(e),
    }
}

/// GET /level/<slug>/，slug 缺省时为入口关卡
pub async fn level(state: &AppState, session: &Session, level_slug: Option<&str>) -> Result<Response> {
    let Some(player) = session_player(state, session).await? else {
        log::debug!("会话中没有有效玩家，返回标题页");
        return Ok(Response::Redirect(Route::Title));
    };

    let slug = level_slug.unwrap_or(state.config.entry_slug.as_str());

    match progression::visit_level(&state.db, player.id, slug).await? {
        Progress::Completed(_) => Ok(Response::Redirect(Route::Leaderboard)),
        Progress::Scene(scene) => {
            let scene = *scene;
            Ok(Response::Level(Box::new(LevelView {
                playername: scene.player.name,
                score: scene.player.score,
                name: scene.level.name,
                description: scene.level.description,
                img_src: scene.level.img_src,
                img_attribution: scene.level.img_attribution,
                buttons: scene
                    .choices
                    .into_iter()
                    .map(|choice| Button {
                        label: choice.label,
                        route: choice.target.into(),
                    })
                    .collect(),
                sidebar: scene.sidebar,
            })))
        }
    }
}

/// GET /leaderboard/
pub async fn leaderboard(
    state: &AppState,
    session: &Session,
    order: LeaderboardOrder,
) -> Result<Response> {
    let current_player_id = session_player(state, session).await?.map(|p| p.id);
    let entries = service::completed_players(&state.db, order)
        .await?
        .into_iter()
        .map(|player| LeaderboardEntry {
            highlighted: Some(player.id) == current_player_id,
            name: player.name,
            slug: player.slug,
            score: player.score,
        })
        .collect();

    Ok(Response::Leaderboard(LeaderboardView {
        entries,
        current_player_id,
    }))
}
