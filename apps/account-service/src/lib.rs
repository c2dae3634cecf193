//! # Account Service ライブラリ
//!
//! Account Service の設定・ユースケース・ハンドラ・ミドルウェアと
//! ルーター構築を公開する。結合テストは [`app_builder::build_router`] で
//! 本番と同じルーターを組み立てる。

pub mod app_builder;
pub mod config;
pub mod error;
pub mod handler;
pub mod middleware;
pub mod usecase;
