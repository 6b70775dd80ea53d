//! The standard 40-cell board.

use super::cell::{Cell, CellKind, Group, Property, Tax};
use crate::Money;

fn street(name: &str, cost: Money, rent: Money, cost_house: Money, rent_house: [Money; 5], group: Group) -> Cell {
    Cell::new(
        name,
        CellKind::Property(Property::new(cost, rent, cost_house, rent_house, group)),
    )
}

fn railroad(name: &str) -> Cell {
    Cell::new(name, CellKind::Property(Property::unimprovable(200, 25, Group::Railroads)))
}

fn utility(name: &str) -> Cell {
    Cell::new(name, CellKind::Property(Property::unimprovable(150, 0, Group::Utilities)))
}

/// Cells of the standard board, Go first.
#[must_use]
pub fn standard_cells() -> Vec<Cell> {
    use Group::{Brown, Green, Indigo, LightBlue, Orange, Pink, Red, Yellow};

    vec![
        Cell::new("GO", CellKind::Plain),
        street("A1 Mediterranean Avenue", 60, 2, 50, [10, 30, 90, 160, 250], Brown),
        Cell::new("COM1 Community Chest", CellKind::CommunityChest),
        street("A2 Baltic Avenue", 60, 4, 50, [20, 60, 180, 320, 450], Brown),
        Cell::new("IT Income Tax", CellKind::Tax(Tax::Income)),
        railroad("R1 Reading Railroad"),
        street("B1 Oriental Avenue", 100, 6, 50, [30, 90, 270, 400, 550], LightBlue),
        Cell::new("CH1 Chance", CellKind::Chance),
        street("B2 Vermont Avenue", 100, 6, 50, [30, 90, 270, 400, 550], LightBlue),
        street("B3 Connecticut Avenue", 120, 8, 50, [40, 100, 300, 450, 600], LightBlue),
        Cell::new("JL Jail", CellKind::Plain),
        street("C1 St. Charles Place", 140, 10, 100, [50, 150, 450, 625, 750], Pink),
        utility("U1 Electric Company"),
        street("C2 States Avenue", 140, 10, 100, [50, 150, 450, 625, 750], Pink),
        street("C3 Virginia Avenue", 160, 12, 100, [60, 180, 500, 700, 900], Pink),
        railroad("R2 Pennsylvania Railroad"),
        street("D1 St. James Place", 180, 14, 100, [70, 200, 550, 700, 950], Orange),
        Cell::new("COM2 Community Chest", CellKind::CommunityChest),
        street("D2 Tennessee Avenue", 180, 14, 100, [70, 200, 550, 700, 950], Orange),
        street("D3 New York Avenue", 200, 16, 100, [80, 220, 600, 800, 1000], Orange),
        Cell::new("FP Free Parking", CellKind::FreeParking),
        street("E1 Kentucky Avenue", 220, 18, 150, [90, 250, 700, 875, 1050], Red),
        Cell::new("CH2 Chance", CellKind::Chance),
        street("E2 Indiana Avenue", 220, 18, 150, [90, 250, 700, 875, 1050], Red),
        street("E3 Illinois Avenue", 240, 20, 150, [100, 300, 750, 925, 1100], Red),
        railroad("R3 B&O Railroad"),
        street("F1 Atlantic Avenue", 260, 22, 150, [110, 330, 800, 975, 1150], Yellow),
        street("F2 Ventnor Avenue", 260, 22, 150, [110, 330, 800, 975, 1150], Yellow),
        utility("U2 Waterworks"),
        street("F3 Marvin Gardens", 280, 24, 150, [120, 360, 850, 1025, 1200], Yellow),
        Cell::new("GTJ Go To Jail", CellKind::GoToJail),
        street("G1 Pacific Avenue", 300, 26, 200, [130, 390, 900, 1100, 1275], Green),
        street("G2 North Carolina Avenue", 300, 26, 200, [130, 390, 900, 1100, 1275], Green),
        Cell::new("COM3 Community Chest", CellKind::CommunityChest),
        street("G3 Pennsylvania Avenue", 320, 28, 200, [150, 450, 1000, 1200, 1400], Green),
        railroad("R4 Short Line"),
        Cell::new("CH3 Chance", CellKind::Chance),
        street("H1 Park Place", 350, 35, 200, [175, 500, 1100, 1300, 1500], Indigo),
        Cell::new("LT Luxury Tax", CellKind::Tax(Tax::Luxury)),
        street("H2 Boardwalk", 400, 50, 200, [200, 600, 1400, 1700, 2000], Indigo),
    ]
}
