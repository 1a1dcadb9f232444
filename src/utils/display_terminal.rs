//! 터미널 출력 포맷팅 유틸리티
//!
//! 서버 기동 시 구성 요소 조립 과정을 박스 제목과 단계 목록으로 보여줍니다.

/// 고정 너비 박스 제목
///
/// ```text
/// ╔══════════════════════════════════════════════════╗
/// ║                 COMMUNITY AUTH                   ║
/// ╚══════════════════════════════════════════════════╝
/// ```
pub fn print_boxed_title(title: &str) {
    let border = "═".repeat(50);

    println!("╔{}╗", border);
    println!("║{:^50}║", title);
    println!("╚{}╝", border);
}

pub fn print_step(step: u8, description: &str) {
    println!("→ Step {}: {}", step, description);
}

pub fn print_sub_task(name: &str, status: &str) {
    println!("   ├─ {}: {}", name, status);
}

/// 조립이 끝난 뒤 저장소 종류와 활성화된 프로바이더를 요약합니다.
pub fn print_context_summary(backend: &str, providers: &[String]) {
    println!();
    print_boxed_title("AUTH CONTEXT READY");
    println!("   📦 Backend: {}", backend);
    if providers.is_empty() {
        println!("   🔑 OAuth providers: (none)");
    } else {
        println!("   🔑 OAuth providers: {}", providers.join(", "));
    }
    println!();
}
