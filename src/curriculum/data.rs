//! Bundled curriculum
//!
//! Used whenever the hosted data store is unavailable. Ids are stable slugs
//! (`m{module}` and `m{module}-t{order}`) so local progress and notes keep
//! pointing at the same topics across runs.

use crate::types::{Module, Topic};

struct TopicSeed {
    title: &'static str,
    subtitle: &'static str,
    challenge: Option<&'static str>,
}

struct ModuleSeed {
    title: &'static str,
    description: &'static str,
    topics: &'static [TopicSeed],
}

const fn topic(title: &'static str, subtitle: &'static str) -> TopicSeed {
    TopicSeed {
        title,
        subtitle,
        challenge: None,
    }
}

/// Challenge topics reuse the subtitle as the challenge text
const fn challenge(title: &'static str, subtitle: &'static str, task: &'static str) -> TopicSeed {
    TopicSeed {
        title,
        subtitle,
        challenge: Some(task),
    }
}

const MODULES: &[ModuleSeed] = &[
    ModuleSeed {
        title: "Grounding & First Principles",
        description: "Build a solid foundation with metrics, value equations, and ethical growth mindset",
        topics: &[
            topic("North Star Metric (NSM) & One Funnel", "Keeps you laser-focused on impact"),
            topic("Value Equation", "Dream outcome × Likelihood – Time – Effort – Cost — Design offers that people can't ignore"),
            topic("Fermi Estimates for Market & CAC/LTV", "Quick maths prevents costly fantasies"),
            topic("User Journey Map", "Aware→Consider→Convert→Retain→Refer — See exactly where to intervene"),
            topic("One-Metric Dashboards (GA4/Sheet)", "Measure what matters, not everything"),
            topic("UTM Hygiene", "Source/medium/campaign — Attribution starts with clean tags"),
            topic("Ethics, Privacy, and Spam-Safe Mindset", "Grow fast without burning trust"),
            challenge(
                "Musk-Mode Mini-Challenge",
                "In 20 minutes, define your NSM, LTV ballpark, and top bottleneck stage",
                "In 20 minutes, define your NSM, LTV ballpark, and top bottleneck stage.",
            ),
        ],
    },
    ModuleSeed {
        title: "Customer, Problem, Positioning",
        description: "Define your ideal customer, understand their jobs-to-be-done, and position your offer",
        topics: &[
            topic("ICP (Ideal Customer Profile) in One Paragraph", "Clarity saves months of trial-and-error"),
            topic("Jobs-To-Be-Done Interview Script", "Hear the real hiring criteria for your product"),
            topic("Pain > Desire > Outcome Ladder", "Write benefits that hit like a train"),
            topic("Category & Competitors Map", "Position to be the obvious choice"),
            topic("Unique Mechanism", "What's different? — Differentiation boosts CTR and trust"),
            topic("One-Line Value Proposition", "If it's not clear, it won't convert"),
            topic("Objection Bank (with Counters)", "Pre-answer doubts, lift conversions fast"),
            challenge(
                "Mini-Challenge",
                "Write a 15-word value prop and 5 objections with crisp counters",
                "Write a 15-word value prop and 5 objections with crisp counters.",
            ),
        ],
    },
    ModuleSeed {
        title: "Offers, Copy, and Landing Pages",
        description: "Create irresistible offers and high-converting landing pages",
        topics: &[
            topic("Core Offer + 2 Bonuses + Risk-Reversal", "Stacked value outsells features"),
            topic("Hero Hook", "Problem → Promise → Proof → Prompt — First 5 seconds decide fate"),
            topic("Proof Assets", "Testimonials, numbers, demos — Proof turns curiosity into belief"),
            topic("Landing Structure (AIDA + FAQs + CTA)", "A clean flow prints conversions"),
            topic("Mobile Speed", "Pagespeed, image compression — Fast pages = cheaper traffic"),
            topic("Form Design & Micro-Copy", "Fewer fields, more leads"),
            topic("Single KPI Per Page", "No distractions, better signal"),
            challenge(
                "Mini-Challenge",
                "Draft a wireframe on paper; write 3 hero hooks; pick one",
                "Draft a wireframe on paper; write 3 hero hooks; pick one.",
            ),
        ],
    },
    ModuleSeed {
        title: "Organic Foundations (SEO + Content)",
        description: "Build sustainable organic traffic through SEO and content strategy",
        topics: &[
            topic("Keyword Intent", "Informational vs Transactional — Match intent, win rankings"),
            topic("Content Pillars & Topic Clusters", "Organised content = compounding traffic"),
            topic("On-Page Basics", "Title, H1, alt, schema — Free SEO wins in an hour"),
            topic("Helpful Content Outline (E-E-A-T)", "Trustworthy guides outrank fluff"),
            topic("Internal Linking & Pillar Hub", "Pass authority like a pro"),
            topic("Simple Content Calendar", "2 posts/week — Consistency beats bursts"),
            topic("ASO Basics (if app)", "Store pages are your new homepage"),
            challenge(
                "Mini-Challenge",
                "Ship one \"pain-to-promise\" blog targeting a transactional keyword this week",
                "Ship one \"pain-to-promise\" blog targeting a transactional keyword this week.",
            ),
        ],
    },
    ModuleSeed {
        title: "Social & Distribution",
        description: "Master social media channels and content distribution",
        topics: &[
            topic("Choose Two Channels", "Home + experimental — Focus multiplies output"),
            topic("Format Stack", "Shorts, carousels, threads — Native formats travel further"),
            topic("Hook Library", "First 2 seconds rule — Win the scroll war early"),
            topic("Content Repurposing Workflow", "One idea → many assets saves time"),
            topic("Community Replies & DMs", "Conversations convert better than posts"),
            topic("Creator/Influencer Short-List", "Borrow audiences, accelerate trust"),
            topic("Posting Cadence & Weekly Review", "Rhythm creates reach"),
            challenge(
                "Mini-Challenge",
                "Repurpose one blog into 5 social assets; post across two channels",
                "Repurpose one blog into 5 social assets; post across two channels.",
            ),
        ],
    },
    ModuleSeed {
        title: "Paid Acquisition (Essentials)",
        description: "Learn the fundamentals of Google and Meta ads without the guru nonsense",
        topics: &[
            topic("Pixels & Conversions (GA4/Ads Manager)", "Without signals, money burns"),
            topic("Offer-Creative-Audience Triangle", "Creatives usually move the needle most"),
            topic("Google Search Basics", "Exact, phrase, negatives — Buy high-intent clicks first"),
            topic("Meta Ads Basics", "Creative testing pods — Test messages fast and cheap"),
            topic("Account Structure for Learning", "Fewer, cleaner campaigns = stable scaling"),
            topic("Bidding & Budgets", "Start small, ramp with MER — Protect cash, learn fast"),
            topic("Ad Compliance & Landing Congruence", "Relevance score lowers CPC"),
            challenge(
                "Mini-Challenge",
                "Launch 1 Google exact-match ad group + 3-creative Meta test with clear UTMs",
                "Launch 1 Google exact-match ad group + 3-creative Meta test with clear UTMs.",
            ),
        ],
    },
    ModuleSeed {
        title: "Lifecycle, CRM & Automation",
        description: "Nurture leads and retain customers with smart automation",
        topics: &[
            topic("Lead Magnets That Truly Help", "Give value, earn permission"),
            topic("Welcome/Onboarding Email (3-Step)", "Great first run = higher LTV"),
            topic("Nurture Cadence", "Teach → Case → Ask — Trust builds with rhythm"),
            topic("RFM Segmentation", "Recent, freq, monetary — Talk differently to different users"),
            topic("WhatsApp/SMS Use-Cases (India-Friendly)", "Timely nudges, not spam"),
            topic("Cart/Browse Abandonment Flows", "Recover easy revenue 24×7"),
            topic("Review/Referral Request Automation", "Happy users become your sales team"),
            challenge(
                "Mini-Challenge",
                "Set a 3-email welcome flow and a cart-abandon reminder in one day",
                "Set a 3-email welcome flow and a cart-abandon reminder in one day.",
            ),
        ],
    },
    ModuleSeed {
        title: "CRO, Experiments & Unit Economics",
        description: "Optimize conversions through testing and understand your numbers",
        topics: &[
            topic("Heuristic Audit", "Clarity, friction, anxiety — Spot fixes without waiting for data"),
            topic("A/B Testing Basics", "One hypothesis rule — Science, not vibes"),
            topic("Social Proof & Risk-Reversal Placement", "Trust near CTAs lifts clicks"),
            topic("Speed, UX, and Accessibility Checks", "Bad UX silently kills ROAS"),
            topic("Cohort Metrics", "CAC payback, LTV curves — Decide scale vs. sustain"),
            topic("Attribution Sanity", "Last vs data-driven — Don't credit the wrong channel"),
            topic("North-Star Review & Next Biggest Constraint", "Always attack the bottleneck"),
            challenge(
                "Mini-Challenge",
                "Run one A/B test on your most-visited page this week",
                "Run one A/B test on your most-visited page this week.",
            ),
        ],
    },
    ModuleSeed {
        title: "Growth Loops & Moats",
        description: "Build sustainable growth engines and competitive advantages",
        topics: &[
            topic("Referral Loop", "Incentives & triggers — Users bring users, CAC drops"),
            topic("Partnerships & Affiliates", "Borrow trust at scale"),
            topic("PR/Launch Moments & Narratives", "Attention spikes feed the funnel"),
            topic("Community & UGC Flywheel", "Content you don't have to write"),
            topic("Product-Led Growth", "Aha, habit, hooks — Feature moments that sell themselves"),
            topic("Retention Levers", "Feature, habit, value — LTV growth compounds everything"),
            topic("Learning Cadence", "Weekly post-mortem — Sharpen the axe every 7 days"),
        ],
    },
];

/// The full bundled curriculum, modules numbered from 0
pub fn bundled_modules() -> Vec<Module> {
    MODULES
        .iter()
        .enumerate()
        .map(|(number, seed)| {
            let module_id = format!("m{}", number);
            let topics = seed
                .topics
                .iter()
                .enumerate()
                .map(|(i, t)| Topic {
                    id: format!("{}-t{}", module_id, i + 1),
                    module_id: module_id.clone(),
                    title: t.title.to_string(),
                    subtitle: t.subtitle.to_string(),
                    order_index: i as u32 + 1,
                    challenge: t.challenge.map(str::to_string),
                })
                .collect();

            Module {
                id: module_id,
                module_number: number as u32,
                title: seed.title.to_string(),
                description: seed.description.to_string(),
                topics,
            }
        })
        .collect()
}
