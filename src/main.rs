mod logger;
mod style;
mod widget;

use data::selection::{DAY_MS, SLIDER_MAX_MS, SLIDER_MIN_MS};
use data::transition::Transition;
use data::view::{self, Domains, ViewModel};
use data::{Dataset, LoadError, Metric, Selection};

use iced::time::{self, Duration, Instant};
use iced::widget::{center, column, container, pick_list, row, text};
use iced::{Alignment, Element, Subscription, Task, Theme};

use widget::chart::LineChart;
use widget::range_slider::RangeSlider;

const DEFAULT_DATA_PATH: &str = "assets/coins.json";

fn main() -> iced::Result {
    if let Err(err) = logger::setup() {
        eprintln!("failed to initialize logging: {err}");
    }

    iced::application(CoinStats::new, CoinStats::update, CoinStats::view)
        .title(CoinStats::title)
        .subscription(CoinStats::subscription)
        .theme(CoinStats::theme)
        .antialiasing(true)
        .run()
}

#[derive(Debug, Clone)]
enum Message {
    DataLoaded(Result<Dataset, LoadError>),
    CoinSelected(CoinEntry),
    MetricSelected(Metric),
    RangeChanged(i64, i64),
    Tick(Instant),
}

/// Coin id plus the human label shown by the picker.
#[derive(Debug, Clone, PartialEq, Eq)]
struct CoinEntry {
    id: String,
    label: String,
}

impl CoinEntry {
    fn new(id: &str) -> Self {
        let label = id
            .split('_')
            .filter(|word| !word.is_empty())
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ");

        Self {
            id: id.to_owned(),
            label,
        }
    }
}

impl std::fmt::Display for CoinEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.label)
    }
}

enum Screen {
    Loading,
    Failed(LoadError),
    Ready(Dashboard),
}

struct CoinStats {
    screen: Screen,
}

impl CoinStats {
    fn new() -> (Self, Task<Message>) {
        let path = std::env::args()
            .nth(1)
            .unwrap_or_else(|| DEFAULT_DATA_PATH.to_owned());
        log::info!("loading dataset from {path}");

        (
            Self {
                screen: Screen::Loading,
            },
            Task::perform(load_dataset(path), Message::DataLoaded),
        )
    }

    fn title(&self) -> String {
        String::from("CoinStats")
    }

    fn theme(&self) -> Theme {
        Theme::TokyoNight
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::DataLoaded(Ok(dataset)) => {
                log::info!("dataset ready: {} series", dataset.coins().len());
                self.screen = Screen::Ready(Dashboard::new(dataset));
            }
            Message::DataLoaded(Err(err)) => {
                log::error!("dataset load failed: {err}");
                self.screen = Screen::Failed(err);
            }
            Message::CoinSelected(coin) => {
                if let Screen::Ready(dashboard) = &mut self.screen {
                    dashboard.selection.coin = coin.id;
                    dashboard.refresh();
                }
            }
            Message::MetricSelected(metric) => {
                if let Screen::Ready(dashboard) = &mut self.screen {
                    dashboard.selection.metric = metric;
                    dashboard.refresh();
                }
            }
            Message::RangeChanged(start, end) => {
                if let Screen::Ready(dashboard) = &mut self.screen {
                    dashboard.selection.set_range(start, end);
                    dashboard.refresh();
                }
            }
            Message::Tick(now) => {
                if let Screen::Ready(dashboard) = &mut self.screen {
                    dashboard.tick(now);
                }
            }
        }

        Task::none()
    }

    fn subscription(&self) -> Subscription<Message> {
        if let Screen::Ready(dashboard) = &self.screen
            && dashboard.transition.is_animating(Instant::now())
        {
            return time::every(Duration::from_millis(16)).map(Message::Tick);
        }

        Subscription::none()
    }

    fn view(&self) -> Element<'_, Message> {
        match &self.screen {
            Screen::Loading => center(text("Waiting for data...").size(16)).into(),
            Screen::Failed(err) => center(text(format!("Failed to load dataset: {err}")).size(16)).into(),
            Screen::Ready(dashboard) => dashboard.view(),
        }
    }
}

/// The ready screen: the loaded dataset, the current selection, and the
/// render model plus transition derived from it.
struct Dashboard {
    dataset: Dataset,
    coins: Vec<CoinEntry>,
    selection: Selection,
    view: ViewModel,
    transition: Transition,
    animated: Domains,
    version: u64,
}

impl Dashboard {
    fn new(dataset: Dataset) -> Self {
        let coins = dataset.coins().iter().map(|id| CoinEntry::new(id)).collect();
        let selection = Selection::initial(&dataset);
        let view = view::compute_view(&dataset, &selection);
        let transition = Transition::idle(view.domains, Instant::now());

        Self {
            coins,
            selection,
            animated: view.domains,
            transition,
            view,
            dataset,
            version: 0,
        }
    }

    /// Single redraw entry point: re-derives the whole render model from
    /// the current selection and retargets the in-flight animation.
    fn refresh(&mut self) {
        let now = Instant::now();
        let view = view::compute_view(&self.dataset, &self.selection);

        self.transition.retarget(view.domains, now);
        self.animated = self.transition.at(now);
        self.view = view;
        self.version += 1;
    }

    fn tick(&mut self, now: Instant) {
        self.animated = self.transition.at(now);
        self.version += 1;
    }

    fn view(&self) -> Element<'_, Message> {
        let selected_coin = self.coins.iter().find(|c| c.id == self.selection.coin).cloned();

        let header = row![
            pick_list(self.coins.as_slice(), selected_coin, Message::CoinSelected),
            pick_list(Metric::ALL, Some(self.selection.metric), Message::MetricSelected),
        ]
        .spacing(12)
        .align_y(Alignment::Center);

        let chart = LineChart::new(&self.view, self.animated).version(self.version);

        let footer = row![
            text(&self.view.range_start_label)
                .size(13)
                .font(style::AXIS_FONT),
            RangeSlider::new(
                (SLIDER_MIN_MS, SLIDER_MAX_MS),
                self.selection.range(),
                DAY_MS,
                Message::RangeChanged,
            ),
            text(&self.view.range_end_label)
                .size(13)
                .font(style::AXIS_FONT),
        ]
        .spacing(12)
        .align_y(Alignment::Center);

        container(
            column![
                header,
                text(self.selection.metric.axis_title()).size(15),
                chart,
                footer,
            ]
            .spacing(12),
        )
        .padding(16)
        .into()
    }
}

async fn load_dataset(path: String) -> Result<Dataset, LoadError> {
    let raw = tokio::fs::read_to_string(&path)
        .await
        .map_err(|err| LoadError::Io(err.to_string()))?;

    Dataset::from_json_str(&raw)
}
