/// Dense table over discrete variables, row-major with the last variable
/// varying fastest.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Factor {
    vars: Vec<usize>,
    cards: Vec<usize>,
    values: Vec<f64>,
}

impl Factor {
    pub(crate) fn new(vars: Vec<usize>, cards: Vec<usize>, values: Vec<f64>) -> Self {
        debug_assert_eq!(vars.len(), cards.len());
        debug_assert_eq!(table_size(&cards), values.len());
        Self { vars, cards, values }
    }

    pub(crate) fn vars(&self) -> &[usize] {
        &self.vars
    }

    pub(crate) fn cards(&self) -> &[usize] {
        &self.cards
    }

    pub(crate) fn values(&self) -> &[f64] {
        &self.values
    }

    pub(crate) fn contains(&self, var: usize) -> bool {
        self.vars.contains(&var)
    }

    pub(crate) fn is_scalar(&self) -> bool {
        self.vars.is_empty()
    }

    /// Value of a factor with no remaining variables.
    pub(crate) fn scalar_value(&self) -> f64 {
        self.values.iter().sum()
    }

    pub(crate) fn product(&self, other: &Factor) -> Factor {
        let mut vars = self.vars.clone();
        let mut cards = self.cards.clone();
        let mut other_slots = Vec::with_capacity(other.vars.len());
        for (var, card) in other.vars.iter().zip(&other.cards) {
            match vars.iter().position(|existing| existing == var) {
                Some(slot) => other_slots.push(slot),
                None => {
                    other_slots.push(vars.len());
                    vars.push(*var);
                    cards.push(*card);
                }
            }
        }

        let size = table_size(&cards);
        let mut values = Vec::with_capacity(size);
        let mut states = vec![0; vars.len()];
        for index in 0..size {
            decode(index, &cards, &mut states);
            let left = encode(states[..self.vars.len()].iter().copied(), &self.cards);
            let right = encode(other_slots.iter().map(|slot| states[*slot]), &other.cards);
            values.push(self.values[left] * other.values[right]);
        }
        Factor::new(vars, cards, values)
    }

    pub(crate) fn sum_out(&self, var: usize) -> Factor {
        let Some(slot) = self.vars.iter().position(|existing| *existing == var) else {
            return self.clone();
        };
        let (vars, cards) = self.without(slot);

        let mut values = vec![0.0; table_size(&cards)];
        let mut states = vec![0; self.vars.len()];
        for (index, value) in self.values.iter().enumerate() {
            decode(index, &self.cards, &mut states);
            let kept = states
                .iter()
                .enumerate()
                .filter(|(position, _)| *position != slot)
                .map(|(_, state)| *state);
            values[encode(kept, &cards)] += value;
        }
        Factor::new(vars, cards, values)
    }

    /// Fixes `var` to `state` and drops it from the scope.
    pub(crate) fn reduce(&self, var: usize, state: usize) -> Factor {
        let Some(slot) = self.vars.iter().position(|existing| *existing == var) else {
            return self.clone();
        };
        let (vars, cards) = self.without(slot);

        let size = table_size(&cards);
        let mut values = Vec::with_capacity(size);
        let mut kept = vec![0; vars.len()];
        for index in 0..size {
            decode(index, &cards, &mut kept);
            let full = kept[..slot]
                .iter()
                .copied()
                .chain(std::iter::once(state))
                .chain(kept[slot..].iter().copied());
            values.push(self.values[encode(full, &self.cards)]);
        }
        Factor::new(vars, cards, values)
    }

    fn without(&self, slot: usize) -> (Vec<usize>, Vec<usize>) {
        let mut vars = self.vars.clone();
        let mut cards = self.cards.clone();
        vars.remove(slot);
        cards.remove(slot);
        (vars, cards)
    }
}

fn table_size(cards: &[usize]) -> usize {
    cards.iter().product()
}

fn decode(mut index: usize, cards: &[usize], states: &mut [usize]) {
    for position in (0..cards.len()).rev() {
        states[position] = index % cards[position];
        index /= cards[position];
    }
}

fn encode(states: impl Iterator<Item = usize>, cards: &[usize]) -> usize {
    states
        .zip(cards)
        .fold(0, |index, (state, card)| index * card + state)
}
