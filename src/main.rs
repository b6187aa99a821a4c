use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};

use debrand_lib::config::{GameConfig, ENTRY_LEVEL_SLUG};
use debrand_lib::database::catalog::{export_catalog, import_catalog, CatalogFile};
use debrand_lib::database::db::{backup_database, close_connection};
use debrand_lib::database::repository::players_repository::LeaderboardOrder;
use debrand_lib::database::service;
use debrand_lib::error::Result;
use debrand_lib::routes::{self, AppState, Session};
use debrand_lib::terminal;
use debrand_lib::utils::logs::init_logging;

#[derive(Debug, Parser)]
#[command(name = "debrand", version, about = "How much of the world is trying to sell you something?")]
struct Cli {
    /// 数据库连接字符串，缺省时使用数据目录下的 debrand.db
    #[arg(long, global = true, env = "DEBRAND_DATABASE_URL")]
    database_url: Option<String>,

    #[arg(long, global = true, env = "DEBRAND_LOG", default_value = "warn")]
    log_level: String,

    #[arg(long, global = true, env = "DEBRAND_LOG_FILE")]
    log_file: Option<PathBuf>,

    /// 入口关卡
    #[arg(long, global = true, env = "DEBRAND_ENTRY_SLUG", default_value = ENTRY_LEVEL_SLUG)]
    entry_slug: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// 在终端中进行一局游戏（默认）
    Play,
    /// 显示排行榜
    Leaderboard {
        #[arg(long, value_enum, default_value_t = OrderArg::Score)]
        order: OrderArg,
    },
    /// 导入/导出内容目录
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
    /// 按当前名称重新生成 slug
    Reslug { kind: ReslugKind, slug: String },
    /// 备份数据库
    Backup {
        /// 备份目录，缺省为数据目录下的 backups
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}

#[derive(Debug, Subcommand)]
enum CatalogAction {
    Import { file: PathBuf },
    /// 未指定文件时输出到 stdout
    Export { file: Option<PathBuf> },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OrderArg {
    Score,
    Name,
    Newest,
}

impl From<OrderArg> for LeaderboardOrder {
    fn from(order: OrderArg) -> Self {
        match order {
            OrderArg::Score => LeaderboardOrder::Score,
            OrderArg::Name => LeaderboardOrder::Name,
            OrderArg::Newest => LeaderboardOrder::Newest,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ReslugKind {
    Level,
    Object,
    Player,
}

impl Cli {
    fn game_config(&self) -> GameConfig {
        GameConfig {
            entry_slug: self.entry_slug.clone(),
            database_url: self.database_url.clone(),
            log_level: self.log_level.clone(),
            log_file: self.log_file.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = cli.game_config();

    if let Err(e) = init_logging(&config.log_level, config.log_file.as_deref()) {
        eprintln!("{}", e);
        return ExitCode::FAILURE;
    }

    match run(cli.command.unwrap_or(Command::Play), config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Command, config: GameConfig) -> Result<()> {
    let state = debrand_lib::init_state(config).await?;
    let result = dispatch(&state, command).await;

    if let Err(e) = close_connection(state.db).await {
        log::warn!("关闭数据库连接失败: {}", e);
    }
    result
}

async fn dispatch(state: &AppState, command: Command) -> Result<()> {
    match command {
        Command::Play => {
            let stdin = io::stdin();
            terminal::play(state, stdin.lock(), io::stdout()).await?;
        }
        Command::Leaderboard { order } => {
            let response = routes::leaderboard(state, &Session::default(), order.into()).await?;
            print!("{}", terminal::render(&response));
        }
        Command::Catalog { action } => match action {
            CatalogAction::Import { file } => {
                let catalog = CatalogFile::load(&file)?;
                let summary = import_catalog(&state.db, &catalog, &state.config.entry_slug).await?;
                println!(
                    "objects: {} created, {} updated; levels: {} created, {} updated",
                    summary.objects_created,
                    summary.objects_updated,
                    summary.levels_created,
                    summary.levels_updated
                );
            }
            CatalogAction::Export { file } => {
                let catalog = export_catalog(&state.db).await?;
                match file {
                    Some(path) => catalog.save(&path)?,
                    None => println!("{}", serde_json::to_string_pretty(&catalog)?),
                }
            }
        },
        Command::Reslug { kind, slug } => {
            let new_slug = match kind {
                ReslugKind::Level => service::reslug_level(&state.db, &slug).await?.slug,
                ReslugKind::Object => service::reslug_game_object(&state.db, &slug).await?.slug,
                ReslugKind::Player => service::reslug_player(&state.db, &slug).await?.slug,
            };
            println!("{} -> {}", slug, new_slug);
        }
        Command::Backup { dir } => {
            let path = backup_database(&state.db, dir.as_deref()).await?;
            println!("{}", path.display());
        }
    }

    Ok(())
}
