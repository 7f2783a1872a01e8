use client_core::{Collection, Turn, TurnRole};
use shared::protocol::{ChartPeriod, DashboardStats, RevenuePoint};

pub fn print_stats(stats: &DashboardStats) {
    println!("Total members:        {}", stats.total_members);
    println!("Total revenue:        ${:.2}", stats.total_revenue);
    println!("Bookings this month:  {}", stats.bookings_this_month);
    println!("Revenue this month:   ${:.2}", stats.revenue_this_month);
}

pub fn print_revenue(period: ChartPeriod, points: &[RevenuePoint]) {
    println!("Revenue, last {}:", period.label());
    if points.is_empty() {
        println!("  (no revenue recorded)");
    }
    for point in points {
        println!("  {}  ${:>10.2}", point.date, point.revenue);
    }
}

pub fn print_collection(collection: &Collection) {
    match collection {
        Collection::Members(members) => {
            println!(
                "{:<6} {:<24} {:<28} {:<10} {:<12} status",
                "id", "name", "email", "tier", "joined"
            );
            for m in members {
                println!(
                    "{:<6} {:<24} {:<28} {:<10} {:<12} {}",
                    m.member_id,
                    m.name,
                    m.email,
                    format!("{:?}", m.membership_tier),
                    m.join_date,
                    m.status
                );
            }
        }
        Collection::Coaches(coaches) => {
            println!("{:<6} {:<24} {:<20} {:>8}", "id", "name", "specialty", "rate");
            for c in coaches {
                println!(
                    "{:<6} {:<24} {:<20} {:>8.2}",
                    c.coach_id,
                    c.name,
                    c.specialty.as_deref().unwrap_or("-"),
                    c.hourly_rate
                );
            }
        }
        Collection::Courts(courts) => {
            println!("{:<6} {:<20} {:<8} indoor", "id", "court", "surface");
            for c in courts {
                println!(
                    "{:<6} {:<20} {:<8} {}",
                    c.court_id,
                    c.court_name,
                    format!("{:?}", c.surface_type).to_lowercase(),
                    if c.indoor { "yes" } else { "no" }
                );
            }
        }
        Collection::Bookings(bookings) => {
            println!(
                "{:<6} {:<11} {:<12} {:<18} {:<16} {:<14} {:>8} status",
                "id", "date", "time", "member", "coach", "court", "price"
            );
            for b in bookings {
                println!(
                    "{:<6} {:<11} {:<12} {:<18} {:<16} {:<14} {:>8.2} {}",
                    b.booking_id,
                    b.booking_date,
                    format!("{}-{}", b.start_time.format("%H:%M"), b.end_time.format("%H:%M")),
                    b.member_name,
                    b.coach_name.as_deref().unwrap_or("-"),
                    b.court_name,
                    b.price,
                    b.status
                );
            }
        }
    }
    println!("({} rows)", collection.len());
}

pub fn print_turn(turn: &Turn) {
    match turn.role {
        TurnRole::User => println!("you> {}", turn.text),
        TurnRole::Assistant => println!("courtiq> {}", turn.text),
    }
}
