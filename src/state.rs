/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - logger: プロセスで 1 つの Logger (middleware から参照)
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 */
use crate::logger::Logger;

#[derive(Clone, Debug)]
pub struct AppState {
    pub logger: Logger,
}

impl AppState {
    pub fn new(logger: Logger) -> Self {
        Self { logger }
    }
}
