//! 설정 모듈 공용 유틸리티.

use std::env;
use std::path::Path;

/// `token_command`의 첫 요소(프로그램)가 실행 가능한 위치에 있는지 확인한다.
pub fn token_command_available(cmd: &[String]) -> bool {
    let Some(program) = cmd.first().map(|s| s.trim()).filter(|s| !s.is_empty()) else {
        return false;
    };

    // 경로가 주어지면 파일 존재만 본다.
    let program_path = Path::new(program);
    if program_path.components().count() > 1 {
        return program_path.is_file();
    }

    env::var_os("PATH")
        .map(|paths| env::split_paths(&paths).any(|dir| is_executable_in(&dir, program)))
        .unwrap_or(false)
}

fn is_executable_in(dir: &Path, program: &str) -> bool {
    if dir.join(program).is_file() {
        return true;
    }
    cfg!(windows)
        && [".exe", ".cmd", ".bat"]
            .iter()
            .any(|ext| dir.join(format!("{program}{ext}")).is_file())
}
