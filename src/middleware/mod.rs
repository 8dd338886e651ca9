/*
 * Responsibility
 * - middleware の公開インターフェース (re-export)
 */
pub mod request_log;
