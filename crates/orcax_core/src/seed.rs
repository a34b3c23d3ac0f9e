//! Built-in seed data.
//!
//! Used when neither the remote store nor the local cache can provide a
//! snapshot, so the application never starts without entities.

use crate::model::member::{MonthlyCost, TeamMember};
use crate::model::project::Project;
use crate::model::snapshot::Snapshot;

/// Annual budget of the fixed planning year.
pub const DEFAULT_ANNUAL_BUDGET: f64 = 405_000.0;

// Apprentice cost includes the 2% FGTS surcharge.
const APPRENTICE_MONTHLY_COST: f64 = 962.53 * 1.02;

/// Returns the default roster.
pub fn seed_team() -> Vec<TeamMember> {
    vec![
        TeamMember::new("laio", "Laio", "PJ / Analista").with_costs(two_tier(2100.0, 8750.0)),
        TeamMember::new("luiz", "Luiz Nelson", "PJ / Analista")
            .with_costs(two_tier(2250.0, 8750.0)),
        TeamMember::new("samuel", "Samuel", "CLT / Analista").with_costs(MonthlyCost::flat(4500.0)),
        TeamMember::new("rodrigo", "Rodrigo", "Consultor").with_costs(MonthlyCost::flat(10000.0)),
        TeamMember::new("aprendiz", "Jovem Aprendiz", "Aprendiz")
            .with_costs(MonthlyCost::flat(APPRENTICE_MONTHLY_COST)),
    ]
}

/// Returns the default project portfolio.
pub fn seed_projects() -> Vec<Project> {
    const CORE_FOUR: [&str; 4] = ["luiz", "laio", "samuel", "rodrigo"];

    vec![
        Project::new(1, "Auditoria Automatizada", "Garantir que a empresa não perca receita")
            .with_schedule(1, 6)
            .with_member("luiz", 60.0)
            .with_member("laio", 40.0)
            .with_member("samuel", 30.0)
            .with_member("rodrigo", 5.0),
        Project::new(2, "Chat Data (Consulta Rápida)", "Acelerar decisões da liderança")
            .with_schedule(7, 6)
            .with_member("luiz", 60.0)
            .with_member("laio", 30.0)
            .with_member("samuel", 30.0)
            .with_member("rodrigo", 5.0),
        Project::new(3, "Fábrica de Processos Padronizados", "Reduzir tempo de implantação")
            .with_schedule(1, 7)
            .with_member("luiz", 30.0)
            .with_member("laio", 30.0)
            .with_unallocated_member("samuel")
            .with_member("rodrigo", 10.0),
        unallocated(4, "Prog. Desenv. Lideranças em IA", "Melhorar qualidade da gestão", 6, 5)
            .with_unallocated_member("luiz")
            .with_unallocated_member("rodrigo"),
        unallocated(5, "Automatização Operacional Central", "Aumentar eficiência operacional", 4, 9)
            .with_unallocated_member("samuel")
            .with_unallocated_member("laio")
            .with_unallocated_member("rodrigo"),
        unallocated(6, "Eficiência Operacional Atendimento", "Garantir qualidade com crescimento", 1, 3),
        with_members(
            unallocated(7, "Análise de Dados de RH", "Apoiar decisões de pessoas", 4, 8),
            &CORE_FOUR,
        ),
        with_members(
            unallocated(8, "Gestão de Brindes no Marketing", "Trazer maior controle patrimonial", 1, 1),
            &CORE_FOUR,
        ),
        with_members(
            unallocated(9, "Revisão Geral sobre Processos", "Revisão de processos e indicadores", 1, 10),
            &CORE_FOUR,
        ),
        with_members(
            unallocated(10, "Wiki para os Clientes", "Clientes tirarem dúvidas", 1, 5),
            &["samuel", "rodrigo", "laio"],
        ),
        with_members(
            unallocated(11, "IA treinada base Wiki Clientes", "IA treinada com base de conhecimento", 7, 5),
            &CORE_FOUR,
        ),
        with_members(
            unallocated(12, "Gestão de Sprint e Atividades", "Sistema para gestão de atividades", 1, 3),
            &["samuel", "rodrigo"],
        ),
        with_members(
            unallocated(13, "Ferramenta Padronizar Solicitações", "Padronizar preenchimento", 3, 3),
            &["samuel", "rodrigo"],
        ),
        with_members(
            unallocated(14, "Abertura Vinculadas Automáticas", "Execução integrada e rastreável", 3, 3),
            &["luiz", "samuel", "rodrigo"],
        ),
        Project::new(15, "Manutenção e Melhoria Contínua", "20% do tempo")
            .with_schedule(1, 12)
            .with_member("aprendiz", 100.0)
            .with_member("samuel", 20.0)
            .with_member("laio", 20.0),
    ]
}

/// Full seed snapshot.
pub fn seed_snapshot() -> Snapshot {
    Snapshot::new(seed_projects(), seed_team())
}

// Jan/Feb carry the lower pre-contract cost, Mar..Dec the full cost.
fn two_tier(early: f64, rest: f64) -> MonthlyCost {
    let mut costs = [rest; 12];
    costs[0] = early;
    costs[1] = early;
    MonthlyCost::from_array(costs)
}

fn unallocated(id: u32, name: &str, objective: &str, start: u32, duration: u32) -> Project {
    Project::new(id, name, objective).with_schedule(start, duration)
}

fn with_members(project: Project, member_ids: &[&str]) -> Project {
    member_ids
        .iter()
        .fold(project, |project, id| project.with_unallocated_member(*id))
}
