use serde::{
    Deserialize,
    Serialize,
};

use super::{
    fields::InputKind,
    ids::ItemId,
};

pub const TWIST_ROLES: &[&str] = &["world", "character", "goal", "loyalties", "assumptions"];

/// The plot-device lists a story profile carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PlotList {
    ForeshadowingSeeds,
    Timebombs,
    RedHerrings,
    ChekovsGuns,
    MultiArcThreads,
    PowerBalanceShifts,
    DramaticIronyLayers,
    ReversalMarkers,
    ThematicEchoScenes,
    CrossroadMoments,
    PlotFlashbacks,
    InterwovenTimelines,
    SymbolicMotifTracking,
    LocationStakes,
    NpcCatalysts,
    ParallelPlotMirror,
    PlotTwistsByRole,
}

impl PlotList {
    pub const ALL: &'static [PlotList] = &[
        PlotList::ForeshadowingSeeds,
        PlotList::Timebombs,
        PlotList::RedHerrings,
        PlotList::ChekovsGuns,
        PlotList::MultiArcThreads,
        PlotList::PowerBalanceShifts,
        PlotList::DramaticIronyLayers,
        PlotList::ReversalMarkers,
        PlotList::ThematicEchoScenes,
        PlotList::CrossroadMoments,
        PlotList::PlotFlashbacks,
        PlotList::InterwovenTimelines,
        PlotList::SymbolicMotifTracking,
        PlotList::LocationStakes,
        PlotList::NpcCatalysts,
        PlotList::ParallelPlotMirror,
        PlotList::PlotTwistsByRole,
    ];

    pub fn key(self) -> &'static str {
        match self {
            PlotList::ForeshadowingSeeds => "foreshadowing_seeds",
            PlotList::Timebombs => "timebombs",
            PlotList::RedHerrings => "red_herrings",
            PlotList::ChekovsGuns => "chekovs_guns",
            PlotList::MultiArcThreads => "multi_arc_threads",
            PlotList::PowerBalanceShifts => "power_balance_shifts",
            PlotList::DramaticIronyLayers => "dramatic_irony_layers",
            PlotList::ReversalMarkers => "reversal_markers",
            PlotList::ThematicEchoScenes => "thematic_echo_scenes",
            PlotList::CrossroadMoments => "crossroad_moments",
            PlotList::PlotFlashbacks => "plot_flashbacks",
            PlotList::InterwovenTimelines => "interwoven_timelines",
            PlotList::SymbolicMotifTracking => "symbolic_motif_tracking",
            PlotList::LocationStakes => "location_stakes",
            PlotList::NpcCatalysts => "npc_catalysts",
            PlotList::ParallelPlotMirror => "parallel_plot_mirror",
            PlotList::PlotTwistsByRole => "plot_twists_by_role",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PlotList::ForeshadowingSeeds => "Foreshadowing Seeds",
            PlotList::Timebombs => "Timebombs",
            PlotList::RedHerrings => "Red Herrings",
            PlotList::ChekovsGuns => "Chekhov's Guns",
            PlotList::MultiArcThreads => "Multi-Arc Threads",
            PlotList::PowerBalanceShifts => "Power Balance Shifts",
            PlotList::DramaticIronyLayers => "Dramatic Irony Layers",
            PlotList::ReversalMarkers => "Reversal Markers",
            PlotList::ThematicEchoScenes => "Thematic Echo Scenes",
            PlotList::CrossroadMoments => "Crossroad Moments",
            PlotList::PlotFlashbacks => "Plot Flashbacks",
            PlotList::InterwovenTimelines => "Interwoven Timelines",
            PlotList::SymbolicMotifTracking => "Symbolic Motif Tracking",
            PlotList::LocationStakes => "Location Stakes",
            PlotList::NpcCatalysts => "NPC Catalysts",
            PlotList::ParallelPlotMirror => "Parallel Plot Mirrors",
            PlotList::PlotTwistsByRole => "Plot Twists by Role",
        }
    }

    pub fn content_label(self) -> &'static str {
        match self {
            PlotList::PlotTwistsByRole => "Twist",
            PlotList::Timebombs => "What is ticking",
            PlotList::RedHerrings => "False lead",
            PlotList::ChekovsGuns => "Planted element",
            _ => "Description",
        }
    }

    /// Label and input kind of the second field, for lists that have one.
    pub fn detail(self) -> Option<(&'static str, InputKind)> {
        match self {
            PlotList::Timebombs => Some(("Goes off in", InputKind::Line)),
            PlotList::RedHerrings => Some(("Actual truth", InputKind::Line)),
            PlotList::ChekovsGuns => Some(("Payoff", InputKind::Line)),
            PlotList::CrossroadMoments => Some(("Choice taken", InputKind::Line)),
            PlotList::PlotFlashbacks => Some(("Placement", InputKind::Line)),
            PlotList::NpcCatalysts => Some(("What they set off", InputKind::Line)),
            PlotList::PlotTwistsByRole => Some(("Role", InputKind::Choice(TWIST_ROLES))),
            _ => None,
        }
    }

    /// Smallest length the editor lets the list shrink to. Lists with a
    /// minimum of one start out holding a blank item.
    pub fn min_items(self) -> usize {
        match self {
            PlotList::RedHerrings
            | PlotList::ChekovsGuns
            | PlotList::PowerBalanceShifts
            | PlotList::PlotTwistsByRole => 1,
            _ => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlotItemField {
    Content,
    Detail,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlotItem {
    pub id: ItemId,
    #[serde(default, alias = "twist")]
    pub content: String,
    /// Sent as `category` for plot elements and `role` for plot twists.
    #[serde(default, alias = "category", alias = "role")]
    pub detail: String,
}

impl PlotItem {
    pub fn new(id: ItemId) -> Self {
        Self { id, content: String::new(), detail: String::new() }
    }

    pub fn get(&self, field: PlotItemField) -> &str {
        match field {
            PlotItemField::Content => &self.content,
            PlotItemField::Detail => &self.detail,
        }
    }

    pub fn set(&mut self, field: PlotItemField, value: String) {
        match field {
            PlotItemField::Content => self.content = value,
            PlotItemField::Detail => self.detail = value,
        }
    }

    pub fn is_blank(&self) -> bool {
        self.content.trim().is_empty() && self.detail.trim().is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotTools {
    pub foreshadowing_seeds: Vec<PlotItem>,
    pub timebombs: Vec<PlotItem>,
    pub red_herrings: Vec<PlotItem>,
    pub chekovs_guns: Vec<PlotItem>,
    pub multi_arc_threads: Vec<PlotItem>,
    pub power_balance_shifts: Vec<PlotItem>,
    pub dramatic_irony_layers: Vec<PlotItem>,
    pub reversal_markers: Vec<PlotItem>,
    pub thematic_echo_scenes: Vec<PlotItem>,
    pub crossroad_moments: Vec<PlotItem>,
    pub plot_flashbacks: Vec<PlotItem>,
    pub interwoven_timelines: Vec<PlotItem>,
    pub symbolic_motif_tracking: Vec<PlotItem>,
    pub location_stakes: Vec<PlotItem>,
    pub npc_catalysts: Vec<PlotItem>,
    pub parallel_plot_mirror: Vec<PlotItem>,
    pub plot_twists_by_role: Vec<PlotItem>,
}

impl PlotTools {
    pub fn items(&self, list: PlotList) -> &[PlotItem] {
        match list {
            PlotList::ForeshadowingSeeds => &self.foreshadowing_seeds,
            PlotList::Timebombs => &self.timebombs,
            PlotList::RedHerrings => &self.red_herrings,
            PlotList::ChekovsGuns => &self.chekovs_guns,
            PlotList::MultiArcThreads => &self.multi_arc_threads,
            PlotList::PowerBalanceShifts => &self.power_balance_shifts,
            PlotList::DramaticIronyLayers => &self.dramatic_irony_layers,
            PlotList::ReversalMarkers => &self.reversal_markers,
            PlotList::ThematicEchoScenes => &self.thematic_echo_scenes,
            PlotList::CrossroadMoments => &self.crossroad_moments,
            PlotList::PlotFlashbacks => &self.plot_flashbacks,
            PlotList::InterwovenTimelines => &self.interwoven_timelines,
            PlotList::SymbolicMotifTracking => &self.symbolic_motif_tracking,
            PlotList::LocationStakes => &self.location_stakes,
            PlotList::NpcCatalysts => &self.npc_catalysts,
            PlotList::ParallelPlotMirror => &self.parallel_plot_mirror,
            PlotList::PlotTwistsByRole => &self.plot_twists_by_role,
        }
    }

    pub fn items_mut(&mut self, list: PlotList) -> &mut Vec<PlotItem> {
        match list {
            PlotList::ForeshadowingSeeds => &mut self.foreshadowing_seeds,
            PlotList::Timebombs => &mut self.timebombs,
            PlotList::RedHerrings => &mut self.red_herrings,
            PlotList::ChekovsGuns => &mut self.chekovs_guns,
            PlotList::MultiArcThreads => &mut self.multi_arc_threads,
            PlotList::PowerBalanceShifts => &mut self.power_balance_shifts,
            PlotList::DramaticIronyLayers => &mut self.dramatic_irony_layers,
            PlotList::ReversalMarkers => &mut self.reversal_markers,
            PlotList::ThematicEchoScenes => &mut self.thematic_echo_scenes,
            PlotList::CrossroadMoments => &mut self.crossroad_moments,
            PlotList::PlotFlashbacks => &mut self.plot_flashbacks,
            PlotList::InterwovenTimelines => &mut self.interwoven_timelines,
            PlotList::SymbolicMotifTracking => &mut self.symbolic_motif_tracking,
            PlotList::LocationStakes => &mut self.location_stakes,
            PlotList::NpcCatalysts => &mut self.npc_catalysts,
            PlotList::ParallelPlotMirror => &mut self.parallel_plot_mirror,
            PlotList::PlotTwistsByRole => &mut self.plot_twists_by_role,
        }
    }

    pub fn item_ids(&self) -> impl Iterator<Item = ItemId> + '_ {
        PlotList::ALL.iter().flat_map(move |list| self.items(*list).iter().map(|item| item.id))
    }

    /// Drops details that only repeat the list key, which is what the request
    /// body carries as `category` for items without one.
    pub fn clear_list_categories(&mut self) {
        for list in PlotList::ALL {
            let has_detail = list.detail().is_some();
            for item in self.items_mut(*list) {
                if !has_detail || item.detail == list.key() {
                    item.detail.clear();
                }
            }
        }
    }

    pub fn total_items(&self) -> usize {
        PlotList::ALL.iter().map(|list| self.items(*list).len()).sum()
    }
}
